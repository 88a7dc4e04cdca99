#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    time::Duration,
};

use opencv::core::{Mat, Scalar, CV_8UC3};
use rstereo_core::{
    CameraBackend, CameraDevice, CameraError, DisplayError, Frame, FrameDisplay, KeyCommand,
    Resolution,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Open(i32),
    Query(i32),
    Request(i32, Resolution),
    Read(i32),
    Release(i32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn count(log: &EventLog, event: &Event) -> usize {
    log.borrow().iter().filter(|e| *e == event).count()
}

pub fn position(log: &EventLog, event: &Event) -> Option<usize> {
    log.borrow().iter().position(|e| e == event)
}

/// How a scripted camera behaves once opened.
#[derive(Clone, Debug)]
pub struct CameraScript {
    size: Resolution,
    max_size: Resolution,
    opened: bool,
    query_fails: bool,
    // number of frames delivered before reads start failing
    frames: Option<usize>,
    fill: f64,
}

impl CameraScript {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Resolution::new(width, height),
            max_size: Resolution::new(width, height),
            opened: true,
            query_fails: false,
            frames: None,
            fill: 128.0,
        }
    }

    pub fn max_size(mut self, width: u32, height: u32) -> Self {
        self.max_size = Resolution::new(width, height);
        self
    }

    pub fn failing_after(mut self, frames: usize) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.query_fails = true;
        self
    }

    pub fn not_opened(mut self) -> Self {
        self.opened = false;
        self
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    scripts: BTreeMap<i32, CameraScript>,
    log: EventLog,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, index: i32, script: CameraScript) -> Self {
        self.scripts.insert(index, script);
        self
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl CameraBackend for ScriptedBackend {
    type Device = ScriptedCamera;

    fn open(&mut self, index: i32) -> Result<ScriptedCamera, CameraError> {
        self.log.borrow_mut().push(Event::Open(index));
        let script = self
            .scripts
            .get(&index)
            .cloned()
            .ok_or(CameraError::Unavailable(index))?;
        Ok(ScriptedCamera {
            index,
            current: script.size,
            script,
            delivered: 0,
            log: self.log.clone(),
        })
    }
}

pub struct ScriptedCamera {
    index: i32,
    script: CameraScript,
    current: Resolution,
    delivered: usize,
    log: EventLog,
}

impl CameraDevice for ScriptedCamera {
    fn index(&self) -> i32 {
        self.index
    }

    fn is_opened(&self) -> bool {
        self.script.opened
    }

    fn frame_size(&self) -> Result<Resolution, CameraError> {
        self.log.borrow_mut().push(Event::Query(self.index));
        if self.script.query_fails {
            return Err(CameraError::Query {
                index: self.index,
                reason: String::from("frame width unsupported"),
            });
        }
        Ok(self.current)
    }

    fn request_frame_size(&mut self, size: Resolution) -> Result<(), CameraError> {
        self.log.borrow_mut().push(Event::Request(self.index, size));
        // coerce like a driver would
        self.current = Resolution::new(
            size.width.min(self.script.max_size.width),
            size.height.min(self.script.max_size.height),
        );
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        self.log.borrow_mut().push(Event::Read(self.index));
        if self.script.frames.is_some_and(|limit| self.delivered >= limit) {
            return Err(CameraError::NoFrame(self.index));
        }
        self.delivered += 1;
        Ok(Mat::new_rows_cols_with_default(
            self.current.height as i32,
            self.current.width as i32,
            CV_8UC3,
            Scalar::all(self.script.fill),
        )?)
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(Event::Release(self.index));
    }
}

#[derive(Debug, Default)]
pub struct DisplayRecord {
    pub shown: Vec<(String, i32, i32)>,
    pub polls: usize,
    pub closes: usize,
}

/// Replays a fixed sequence of key polls. An exhausted script answers with
/// quit so a broken loop cannot spin forever.
pub struct ScriptedDisplay {
    keys: VecDeque<Option<KeyCommand>>,
    record: Rc<RefCell<DisplayRecord>>,
    show_fails: bool,
    // runs before poll number n (1-based) answers
    on_poll: Option<Box<dyn FnMut(usize)>>,
}

impl ScriptedDisplay {
    pub fn new(keys: impl IntoIterator<Item = Option<KeyCommand>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            record: Rc::default(),
            show_fails: false,
            on_poll: None,
        }
    }

    pub fn failing_show(mut self) -> Self {
        self.show_fails = true;
        self
    }

    pub fn on_poll(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.on_poll = Some(Box::new(hook));
        self
    }

    pub fn idle() -> Self {
        Self::new(Vec::<Option<KeyCommand>>::new())
    }

    pub fn record(&self) -> Rc<RefCell<DisplayRecord>> {
        self.record.clone()
    }
}

impl FrameDisplay for ScriptedDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError> {
        use opencv::prelude::*;
        if self.show_fails {
            return Err(DisplayError::OpenCv(opencv::Error::new(
                opencv::core::StsError,
                "window could not be created",
            )));
        }
        self.record
            .borrow_mut()
            .shown
            .push((window.to_owned(), frame.cols(), frame.rows()));
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<KeyCommand>, DisplayError> {
        let polls = {
            let mut record = self.record.borrow_mut();
            record.polls += 1;
            record.polls
        };
        if let Some(hook) = self.on_poll.as_mut() {
            hook(polls);
        }
        Ok(self.keys.pop_front().unwrap_or(Some(KeyCommand::Quit)))
    }

    fn close_all(&mut self) -> Result<(), DisplayError> {
        self.record.borrow_mut().closes += 1;
        Ok(())
    }
}
