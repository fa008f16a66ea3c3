//! Host command line codec.
//!
//! The supervisory link carries plain newline- or carriage-return-
//! terminated tokens with no checksum — this channel is lower-assurance
//! by design.  Lines longer than the cap are force-terminated and
//! compared as-is, so an over-long token simply fails to match.

use heapless::Vec;

/// Hard cap on accumulated line bytes before a forced flush.
pub const LINE_CAP: usize = 6;

/// Commands the supervisory host can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// `START` — begin the sensing session.
    Start,
    /// `RESET` — tear the session down and return to idle.
    Reset,
}

/// Streaming line decoder for the host link.  One per link, owned by the
/// task draining that link's bytes.
#[derive(Debug, Default)]
pub struct HostLineDecoder {
    buf: Vec<u8, LINE_CAP>,
}

impl HostLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a command when a completed line matches a
    /// known token.  Unrecognized lines are silently discarded.
    pub fn push(&mut self, byte: u8) -> Option<HostCommand> {
        if byte == b'\n' || byte == b'\r' || self.buf.is_full() {
            let cmd = match self.buf.as_slice() {
                b"START" => Some(HostCommand::Start),
                b"RESET" => Some(HostCommand::Reset),
                _ => None,
            };
            self.buf.clear();
            cmd
        } else {
            // Capacity checked above; push cannot fail.
            let _ = self.buf.push(byte);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(dec: &mut HostLineDecoder, line: &[u8]) -> Option<HostCommand> {
        let mut out = None;
        for &b in line {
            if let Some(cmd) = dec.push(b) {
                out = Some(cmd);
            }
        }
        out
    }

    #[test]
    fn start_and_reset_tokens() {
        let mut dec = HostLineDecoder::new();
        assert_eq!(feed(&mut dec, b"START\n"), Some(HostCommand::Start));
        assert_eq!(feed(&mut dec, b"RESET\r"), Some(HostCommand::Reset));
    }

    #[test]
    fn unknown_lines_are_discarded() {
        let mut dec = HostLineDecoder::new();
        assert_eq!(feed(&mut dec, b"HELLO\n"), None);
        assert_eq!(feed(&mut dec, b"start\n"), None); // case-sensitive
        assert_eq!(feed(&mut dec, b"\n"), None);
        // Decoder still works afterwards.
        assert_eq!(feed(&mut dec, b"START\n"), Some(HostCommand::Start));
    }

    #[test]
    fn overlong_line_is_force_flushed() {
        let mut dec = HostLineDecoder::new();
        // Seven bytes: the cap fires on the seventh, which is discarded,
        // and the six buffered bytes fail to match either token.
        assert_eq!(feed(&mut dec, b"STARTXY\n"), None);
        assert_eq!(feed(&mut dec, b"START\n"), Some(HostCommand::Start));
    }

    #[test]
    fn command_split_across_pushes() {
        let mut dec = HostLineDecoder::new();
        assert_eq!(feed(&mut dec, b"STA"), None);
        assert_eq!(feed(&mut dec, b"RT\n"), Some(HostCommand::Start));
    }
}
