//! In-memory stand-ins for the database and the completion service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use query_engine_execution::completion::CompletionService;
use query_engine_execution::connection::{Access, Connection, Connector};
use query_engine_execution::result_set::ResultSet;
use query_engine_execution::Error;
use query_engine_sql::sql;

type Responder = dyn Fn(&sql::string::SQL) -> Result<ResultSet, String> + Send + Sync;

/// What happened to the connections handed out by a [`FakeConnector`].
#[derive(Default)]
pub struct ConnectionLog {
    statements: Mutex<Vec<(sql::string::SQL, Access)>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl ConnectionLog {
    /// Every statement run, in order.
    pub fn statements(&self) -> Vec<sql::string::SQL> {
        self.statements
            .lock()
            .map(|statements| statements.iter().map(|(sql, _)| sql.clone()).collect())
            .unwrap_or_default()
    }

    /// The access each statement asked for, in the same order as [`Self::statements`].
    pub fn accesses(&self) -> Vec<Access> {
        self.statements
            .lock()
            .map(|statements| statements.iter().map(|(_, access)| *access).collect())
            .unwrap_or_default()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// A connector whose connections answer every statement through a function.
#[derive(Clone)]
pub struct FakeConnector {
    responder: Arc<Responder>,
    unreachable: Option<String>,
    log: Arc<ConnectionLog>,
}

impl FakeConnector {
    /// Answer every statement with the same result set.
    pub fn returning(result_set: ResultSet) -> Self {
        Self::responding(move |_| Ok(result_set.clone()))
    }

    /// Answer each statement with whatever `responder` returns. `Err` becomes a statement failure.
    pub fn responding(
        responder: impl Fn(&sql::string::SQL) -> Result<ResultSet, String> + Send + Sync + 'static,
    ) -> Self {
        FakeConnector {
            responder: Arc::new(responder),
            unreachable: None,
            log: Arc::default(),
        }
    }

    /// A database that refuses every connection.
    pub fn unreachable(message: &str) -> Self {
        FakeConnector {
            unreachable: Some(message.to_string()),
            ..Self::returning(ResultSet::empty())
        }
    }

    pub fn log(&self) -> Arc<ConnectionLog> {
        self.log.clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn acquire(&self) -> Result<Box<dyn Connection>, Error> {
        if let Some(message) = &self.unreachable {
            return Err(Error::Connection(message.clone()));
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            responder: self.responder.clone(),
            log: self.log.clone(),
        }))
    }
}

struct FakeConnection {
    responder: Arc<Responder>,
    log: Arc<ConnectionLog>,
}

#[async_trait]
impl Connection for FakeConnection {
    async fn fetch_all(
        &mut self,
        statement: &sql::string::SQL,
        access: Access,
    ) -> Result<ResultSet, Error> {
        if let Ok(mut statements) = self.log.statements.lock() {
            statements.push((statement.clone(), access));
        }
        (self.responder)(statement).map_err(Error::Statement)
    }

    async fn close(self: Box<Self>) -> Result<(), Error> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A completion service with a fixed answer that remembers the prompts it was given.
#[derive(Clone)]
pub struct FakeCompletion {
    answer: Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeCompletion {
    pub fn answering(answer: &str) -> Self {
        FakeCompletion {
            answer: Ok(answer.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        FakeCompletion {
            answer: Err(message.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answer.clone().map_err(Error::Completion)
    }
}

/// Build a result set from column names and positional rows.
pub fn table(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> ResultSet {
    ResultSet::new(
        columns.iter().map(|name| (*name).to_string()).collect(),
        rows,
    )
}
