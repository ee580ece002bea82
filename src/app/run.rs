use std::io;
use std::time::{Duration, Instant};

use crossterm::event;
use ratatui::prelude::*;

use ac_base::config::constants::EVENT_POLL_MS;

use crate::app::App;
use crate::app::events::handle_event;
use crate::ui;

impl App {
    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.persist();

        loop {
            // Input first: block at most one poll interval
            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                let evt = event::read()?;
                if matches!(evt, event::Event::Resize(..)) {
                    self.ui.dirty = true;
                }
                let Some(action) = handle_event(&evt, self) else {
                    // Quit: make sure the final snapshot is on disk
                    self.shutdown();
                    break;
                };
                self.handle_action(action);
            }

            self.process_background(Instant::now());

            if self.ui.dirty {
                terminal.draw(|frame| ui::render(frame, self))?;
                self.ui.dirty = false;
            }
        }

        if self.controller.is_submitting() {
            tracing::info!("quitting with a generation request in flight; its result is discarded");
        }
        Ok(())
    }
}
