//! The container stack.
//!
//! One frame per unclosed container on the path from the root. Object frames
//! hold the pending key between its string and the colon-separated value.
//! A completed top-level value lands in the root slot, from which the engine
//! delivers it.

use alloc::{string::String, vec::Vec};

use crate::{
    error::ErrorKind,
    value::{Map, Value},
};

#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object { map: Map, key: Option<String> },
}

#[derive(Debug, Default)]
pub(crate) struct ContainerStack {
    frames: Vec<Frame>,
    root: Option<Value>,
}

impl ContainerStack {
    /// Drops all frames and any pending root. Frame capacity is retained.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.root = None;
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn open_array(&mut self) {
        self.frames.push(Frame::Array(Vec::new()));
    }

    pub fn open_object(&mut self) {
        self.frames.push(Frame::Object {
            map: Map::new(),
            key: None,
        });
    }

    pub fn in_object(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Object { .. }))
    }

    /// Stores the key awaiting its value in the innermost object.
    pub fn set_key(&mut self, key: String) {
        if let Some(Frame::Object { key: pending, .. }) = self.frames.last_mut() {
            *pending = Some(key);
        }
    }

    /// Attaches a completed value to the innermost container, or makes it the
    /// root when no container is open.
    pub fn add(&mut self, value: Value) {
        match self.frames.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { map, key }) => {
                if let Some(k) = key.take() {
                    map.insert(k, value);
                }
            }
            None => self.root = Some(value),
        }
    }

    pub fn close_array(&mut self) -> Result<(), ErrorKind> {
        match self.frames.pop() {
            Some(Frame::Array(items)) => {
                self.add(Value::Array(items));
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(ErrorKind::UnexpectedArrayClose),
            None => Err(ErrorKind::TooManyCloses),
        }
    }

    pub fn close_object(&mut self) -> Result<(), ErrorKind> {
        match self.frames.pop() {
            Some(Frame::Object { map, .. }) => {
                self.add(Value::Object(map));
                Ok(())
            }
            Some(Frame::Array(_)) => Err(ErrorKind::UnexpectedObjectClose),
            None => Err(ErrorKind::TooManyCloses),
        }
    }

    pub fn take_root(&mut self) -> Option<Value> {
        self.root.take()
    }
}
