//! Hotel document lookup used when the dispatcher falls back.
//!
//! Uploaded documents are split into paragraph chunks and indexed with BM25
//! (English stemming, stop words dropped). A question is answered by handing the
//! best-scoring chunks to the LLM as context.

use serde::{Deserialize, Serialize};
use tantivy::{
    collector::TopDocs,
    query::QueryParser,
    schema::{
        Field, IndexRecordOption, OwnedValue, Schema, TextFieldIndexing, TextOptions, STORED,
        STRING,
    },
    tokenizer::{
        Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
        TextAnalyzer,
    },
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::services::ai::{LlmProvider, Message};

/// Chunk size cap, counted in grapheme clusters.
const MAX_CHUNK_GRAPHEMES: usize = 800;

const TOKENIZER: &str = "hotel_en";
const WRITER_HEAP_BYTES: usize = 20_000_000;

pub const NOT_FOUND_REPLY: &str =
    "I couldn't find anything about that in the hotel documents. Could you rephrase, or say 'book a room' to make a reservation?";

const SYSTEM_PROMPT: &str = r#"You are a helpful hotel concierge. Answer the guest's question using ONLY the hotel information provided below.
If the information does not contain the answer, say you don't know and suggest contacting the front desk.
Keep answers short and friendly."#;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentChunk {
    pub source: String,
    pub text: String,
}

/// In-memory BM25 index over the chunks of one upload.
pub struct DocumentIndex {
    index: Index,
    reader: IndexReader,
    source_field: Field,
    text_field: Field,
    chunks: usize,
    documents: usize,
}

impl DocumentIndex {
    pub fn len(&self) -> usize {
        self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// Chunks matching at least one term of `question`, best BM25 score first.
    pub fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<DocumentChunk>, DocumentError> {
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        // Guests type free text, so query syntax errors only drop the offending part.
        let parser = QueryParser::for_index(&self.index, vec![self.text_field]);
        let (query, errors) = parser.parse_query_lenient(question);
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "ignored unparsable parts of question");
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(top_k))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(DocumentChunk {
                source: stored_text(&doc, self.source_field),
                text: stored_text(&doc, self.text_field),
            });
        }
        Ok(hits)
    }
}

pub fn ingest(documents: &[UploadedDocument]) -> Result<DocumentIndex, DocumentError> {
    let mut schema_builder = Schema::builder();
    let text_options = TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored();
    let source_field = schema_builder.add_text_field("source", STRING | STORED);
    let text_field = schema_builder.add_text_field("text", text_options);

    let index = Index::create_in_ram(schema_builder.build());
    index.tokenizers().register(TOKENIZER, analyzer());

    let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
    let mut chunk_count = 0;
    let mut document_count = 0;

    for doc in documents {
        let chunks = chunk_paragraphs(&doc.content);
        if chunks.is_empty() {
            tracing::warn!(document = %doc.name, "document has no text, skipping");
            continue;
        }
        document_count += 1;
        for text in chunks {
            let mut entry = TantivyDocument::default();
            entry.add_text(source_field, &doc.name);
            entry.add_text(text_field, &text);
            writer.add_document(entry)?;
            chunk_count += 1;
        }
    }
    writer.commit()?;

    let reader: IndexReader = index
        .reader_builder()
        .reload_policy(ReloadPolicy::Manual)
        .try_into()?;

    tracing::info!(
        documents = document_count,
        chunks = chunk_count,
        "documents ingested"
    );
    Ok(DocumentIndex {
        index,
        reader,
        source_field,
        text_field,
        chunks: chunk_count,
        documents: document_count,
    })
}

pub async fn answer(
    llm: &dyn LlmProvider,
    question: &str,
    index: &DocumentIndex,
    top_k: usize,
) -> anyhow::Result<String> {
    let context = index.retrieve(question, top_k)?;
    if context.is_empty() {
        return Ok(NOT_FOUND_REPLY.to_string());
    }

    let context = context
        .iter()
        .map(|c| format!("[{}]\n{}", c.source, c.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    let system = format!("{SYSTEM_PROMPT}\n\nHotel information:\n{context}");

    llm.chat(&system, &[Message::user(question)]).await
}

fn analyzer() -> TextAnalyzer {
    let base = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser);

    match StopWordFilter::new(Language::English) {
        Some(stop_words) => base
            .filter(stop_words)
            .filter(Stemmer::new(Language::English))
            .build(),
        None => base.filter(Stemmer::new(Language::English)).build(),
    }
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    match doc.get_first(field) {
        Some(OwnedValue::Str(s)) => s.clone(),
        _ => String::new(),
    }
}

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

fn chunk_paragraphs(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut size = 0;

    for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        for piece in split_long(para) {
            let len = grapheme_len(&piece);
            if !current.is_empty() && size + len + 2 > MAX_CHUNK_GRAPHEMES {
                chunks.push(std::mem::take(&mut current));
                size = 0;
            }
            if !current.is_empty() {
                current.push_str("\n\n");
                size += 2;
            }
            current.push_str(&piece);
            size += len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Breaks a paragraph longer than a chunk at sentence bounds, falling back to
/// word bounds for oversized sentences.
fn split_long(para: &str) -> Vec<String> {
    if grapheme_len(para) <= MAX_CHUNK_GRAPHEMES {
        return vec![para.to_string()];
    }

    let units = para.split_sentence_bounds().flat_map(|sentence| {
        if grapheme_len(sentence) > MAX_CHUNK_GRAPHEMES {
            sentence.split_word_bounds().collect::<Vec<_>>()
        } else {
            vec![sentence]
        }
    });

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut size = 0;
    for unit in units {
        let len = grapheme_len(unit);
        if size + len > MAX_CHUNK_GRAPHEMES && !piece.trim().is_empty() {
            pieces.push(piece.trim().to_string());
            piece.clear();
            size = 0;
        }
        piece.push_str(unit);
        size += len;
    }
    if !piece.trim().is_empty() {
        pieces.push(piece.trim().to_string());
    }
    pieces
}
