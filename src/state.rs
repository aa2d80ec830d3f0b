use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rusqlite::Connection;
use tokio::sync::Mutex as SessionLock;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::ChatState;
use crate::services::ai::LlmProvider;
use crate::services::chat;
use crate::services::documents::DocumentIndex;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    /// One `ChatState` per conversation, keyed by session id. The per-session
    /// lock is held for a whole exchange, fallback answering included.
    pub sessions: Mutex<HashMap<String, Arc<SessionLock<ChatState>>>>,
    pub documents: RwLock<Option<Arc<DocumentIndex>>>,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig, llm: Box<dyn LlmProvider>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            llm,
            sessions: Mutex::new(HashMap::new()),
            documents: RwLock::new(None),
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("database lock poisoned")))
    }

    fn sessions(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, Arc<SessionLock<ChatState>>>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("session store lock poisoned")))
    }

    /// The session's state, created fresh on first use.
    pub fn session(&self, session_id: &str) -> Result<Arc<SessionLock<ChatState>>, AppError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(SessionLock::new(chat::initialize_chat_state())));
        Ok(Arc::clone(session))
    }

    pub fn existing_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Arc<SessionLock<ChatState>>>, AppError> {
        Ok(self.sessions()?.get(session_id).cloned())
    }

    pub fn document_index(&self) -> Option<Arc<DocumentIndex>> {
        self.documents.read().ok().and_then(|index| index.as_ref().cloned())
    }
}
