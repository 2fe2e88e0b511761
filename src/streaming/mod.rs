//! Level-streaming contract.
//!
//! The host engine owns actual level streaming; the gameplay core only asks
//! for a named instance at a transform and keeps the returned handle. The
//! in-memory implementation backs headless hosts and tests.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use thiserror::Error;

use crate::levels::LevelRef;

/// Failure reported by the streaming collaborator
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("streaming request `{0}` rejected by host")]
    Rejected(String),
}

/// Handle to a streamed level instance
pub trait StreamedLevel: Send + Sync {
    fn level_ref(&self) -> &LevelRef;
    fn unique_name(&self) -> &str;
    fn set_visible(&mut self, visible: bool);
    fn request_unload(&mut self);
}

/// Streaming collaborator: loads a level instance at a transform under a
/// unique name and hands back a handle
pub trait LevelStreamer: Send + Sync {
    fn load_instance(
        &mut self,
        level: &LevelRef,
        at: Transform,
        unique_name: &str,
    ) -> Result<Box<dyn StreamedLevel>, StreamError>;
}

/// Shared record of everything a [`MemoryStreamer`] and its handles were asked to do
#[derive(Debug, Default)]
pub struct StreamLog {
    /// (level path, unique name) per successful load, in order
    pub loads: Vec<(String, String)>,
    /// Unique names made visible, in order
    pub shown: Vec<String>,
    /// Unique names unloaded, in order
    pub unloads: Vec<String>,
}

/// In-memory streamer: accepts every load (unless told to fail) and records
/// the request stream for inspection
pub struct MemoryStreamer {
    log: Arc<Mutex<StreamLog>>,
    fail_loads: bool,
}

impl Default for MemoryStreamer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStreamer {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(StreamLog::default())),
            fail_loads: false,
        }
    }

    /// Make every subsequent load request fail
    pub fn failing() -> Self {
        Self {
            fail_loads: true,
            ..Self::new()
        }
    }

    /// Shared handle to the request log
    pub fn log(&self) -> Arc<Mutex<StreamLog>> {
        Arc::clone(&self.log)
    }
}

impl LevelStreamer for MemoryStreamer {
    fn load_instance(
        &mut self,
        level: &LevelRef,
        _at: Transform,
        unique_name: &str,
    ) -> Result<Box<dyn StreamedLevel>, StreamError> {
        if self.fail_loads {
            return Err(StreamError::Rejected(unique_name.to_string()));
        }
        self.log
            .lock()
            .expect("stream log poisoned")
            .loads
            .push((level.path().to_string(), unique_name.to_string()));
        Ok(Box::new(MemoryLevel {
            level: level.clone(),
            unique_name: unique_name.to_string(),
            log: Arc::clone(&self.log),
        }))
    }
}

/// Handle issued by [`MemoryStreamer`]
pub struct MemoryLevel {
    level: LevelRef,
    unique_name: String,
    log: Arc<Mutex<StreamLog>>,
}

impl StreamedLevel for MemoryLevel {
    fn level_ref(&self) -> &LevelRef {
        &self.level
    }

    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    fn set_visible(&mut self, visible: bool) {
        if visible {
            self.log
                .lock()
                .expect("stream log poisoned")
                .shown
                .push(self.unique_name.clone());
        }
    }

    fn request_unload(&mut self) {
        self.log
            .lock()
            .expect("stream log poisoned")
            .unloads
            .push(self.unique_name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_streamer_records_loads() {
        let mut streamer = MemoryStreamer::new();
        let level = LevelRef::new("/Game/Levels/lvl_A.lvl_A");

        let mut handle = streamer
            .load_instance(&level, Transform::IDENTITY, "lvl_A7")
            .unwrap();
        handle.set_visible(true);
        handle.request_unload();

        let log = streamer.log();
        let log = log.lock().unwrap();
        assert_eq!(log.loads, vec![("/Game/Levels/lvl_A.lvl_A".to_string(), "lvl_A7".to_string())]);
        assert_eq!(log.shown, vec!["lvl_A7"]);
        assert_eq!(log.unloads, vec!["lvl_A7"]);
    }

    #[test]
    fn test_failing_streamer() {
        let mut streamer = MemoryStreamer::failing();
        let level = LevelRef::new("/Game/Levels/lvl_A.lvl_A");

        let result = streamer.load_instance(&level, Transform::IDENTITY, "lvl_A1");
        assert!(result.is_err());
        assert!(streamer.log().lock().unwrap().loads.is_empty());
    }

    #[test]
    fn test_handle_exposes_identity() {
        let mut streamer = MemoryStreamer::new();
        let level = LevelRef::new("/Game/Levels/lvl_B.lvl_B");
        let handle = streamer
            .load_instance(&level, Transform::IDENTITY, "lvl_B3")
            .unwrap();
        assert_eq!(handle.level_ref(), &level);
        assert_eq!(handle.unique_name(), "lvl_B3");
    }
}
