//! Mock implementations for testing the upstream client

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::TransportError;
use crate::services::upstream::{Clock, HttpTransport, TransportResponse};

pub type Outcome = Result<TransportResponse, TransportError>;
type Responder = Box<dyn Fn(&[(String, String)]) -> Outcome + Send + Sync>;
type Latency = Box<dyn Fn(&[(String, String)]) -> Duration + Send + Sync>;

pub fn ok(body: &str) -> Outcome {
    Ok(TransportResponse::new(200, body))
}

pub fn status(code: u16) -> Outcome {
    Ok(TransportResponse::new(code, ""))
}

pub fn query_value<'a>(query: &'a [(String, String)], name: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Transport answering from a queue of outcomes or from a closure.
///
/// Records every call together with the (tokio) instant it was made.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    responder: Option<Responder>,
    latency: Option<Latency>,
    calls: Mutex<Vec<(Vec<(String, String)>, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    /// Answer calls in order from `outcomes`; an exhausted script is a transport error
    pub fn from_script(outcomes: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            responder: None,
            latency: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answer every call with the result of `responder`
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&[(String, String)]) -> Outcome + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::from_script(Vec::new())
        }
    }

    /// Delay each answer by `latency(query)`
    pub fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(&[(String, String)]) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Box::new(latency));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn queries(&self) -> Vec<Vec<(String, String)>> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_vec(), Instant::now()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(query)).await;
        }

        let outcome = match &self.responder {
            Some(responder) => responder(query),
            None => self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::other("script exhausted"))),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    pub fn now_datetime(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    pub fn now_timestamp(&self) -> i64 {
        self.now.lock().unwrap().timestamp()
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now = *now + ChronoDuration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
