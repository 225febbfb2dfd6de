use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded message pump for the terminal host.
///
/// The loop is the only caller of `driver.poll()` / `driver.read()`. Each
/// iteration first calls the handler with `None`, which is the animation
/// frame tick: the host commits coalesced pointer gestures and redraws
/// there. Pending input is then drained in one burst so a fast mouse drag
/// collapses into a single commit on the next tick.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs until the handler returns [`ControlFlow::Quit`].
    ///
    /// The handler is called with:
    /// - `Some(event)` for each input event.
    /// - `None` once per iteration, before input is drained.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ScriptedInputDriver;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn burst_is_drained_between_ticks() {
        let driver = ScriptedInputDriver::new(vec![key('a'), key('b'), key('c')]);
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(0));
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                seen.push(event.is_some());
                if seen.len() > 5 {
                    return Ok(ControlFlow::Quit);
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(seen, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn quit_from_event_stops_immediately() {
        let driver = ScriptedInputDriver::new(vec![key('q'), key('x')]);
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(0));
        let mut events = 0;
        event_loop
            .run(|_, event| match event {
                Some(_) => {
                    events += 1;
                    Ok(ControlFlow::Quit)
                }
                None => Ok(ControlFlow::Continue),
            })
            .unwrap();
        assert_eq!(events, 1);
        assert_eq!(event_loop.driver().remaining(), 1);
    }
}
