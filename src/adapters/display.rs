//! Log-backed display adapter.
//!
//! Stands in for a status panel when none is wired: every render request
//! becomes a log line.  `probe()` reports whatever it was built with, so
//! the same adapter also exercises the "panel absent" path.

use log::info;

use crate::app::ports::DisplayPort;
use crate::lamp::ChannelSnapshot;

pub struct LogDisplay {
    present: bool,
}

impl LogDisplay {
    pub fn new(present: bool) -> Self {
        Self { present }
    }
}

impl DisplayPort for LogDisplay {
    fn probe(&mut self) -> bool {
        self.present
    }

    fn render_channels(&mut self, snapshot: &ChannelSnapshot) {
        let [a, b, c] = snapshot.lamps;
        let fmt = |on: bool| if on { "on " } else { "off" };
        info!(
            "DISPLAY | [{}] A {} {:3} | B {} {:3} | C {} {:3}",
            snapshot.selected,
            fmt(a.is_on),
            a.value,
            fmt(b.is_on),
            b.value,
            fmt(c.is_on),
            c.value,
        );
    }

    fn render_clock(&mut self) {
        info!("DISPLAY | clock");
    }

    fn render_progress_bar(&mut self, value: u8) {
        // 16-cell bar.
        let cells = usize::from(value) * 16 / 255;
        let mut bar = heapless::String::<16>::new();
        for i in 0..16 {
            let _ = bar.push(if i < cells { '#' } else { '.' });
        }
        info!("DISPLAY | {} {:3}", bar, value);
    }

    fn on_first_activation(&mut self) {
        self.render_clock();
    }
}
