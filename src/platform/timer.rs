//! `setInterval`-backed tick scheduler

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::session::Scheduler;

/// Id returned by `setInterval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalId(i32);

/// Runs one callback on browser intervals.
///
/// The callback closure lives as long as the scheduler; every interval it
/// starts calls the same closure.
pub struct IntervalScheduler {
    callback: Closure<dyn FnMut()>,
}

impl IntervalScheduler {
    pub fn new(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::<dyn FnMut()>::new(on_tick),
        }
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = Option<IntervalId>;

    fn start(&mut self, interval: Duration) -> Option<IntervalId> {
        let window = web_sys::window()?;
        let ms = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            ms,
        ) {
            Ok(id) => {
                log::debug!("Tick timer {} armed at {} ms", id, ms);
                Some(IntervalId(id))
            }
            Err(e) => {
                log::error!("setInterval failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: Option<IntervalId>) {
        let (Some(IntervalId(id)), Some(window)) = (handle, web_sys::window()) else {
            return;
        };
        window.clear_interval_with_handle(id);
        log::debug!("Tick timer {} cancelled", id);
    }
}
