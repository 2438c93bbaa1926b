//! Telnet byte-stream codec (§4.E): IAC/option negotiation, line framing,
//! and outbound color substitution. Grounded on the teacher's
//! `network_manager.rs` buffer-accumulation style (`tbuf`/`obuf` byte
//! copies) but built around an explicit state machine, since the teacher
//! never negotiated telnet options itself.

const IAC: u8 = 255;
const WILL: u8 = 251;
const WONT: u8 = 252;
const DO: u8 = 253;
const DONT: u8 = 254;
const SB: u8 = 250;
const SE: u8 = 240;

const OPT_ECHO: u8 = 1;
const OPT_SUPPRESS_GO_AHEAD: u8 = 3;
const OPT_TERMINAL_TYPE: u8 = 24;
const OPT_NAWS: u8 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Data,
    SawIac,
    SawWillWontDoDont(NegotiationVerb),
    InSubnegotiation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NegotiationVerb {
    Will,
    Wont,
    Do,
    Dont,
}

/// A per-connection telnet codec. `feed` consumes raw bytes off the
/// socket and returns completed input lines plus any negotiation replies
/// that must be written back immediately.
pub struct TelnetCodec {
    state: DecodeState,
    line_buffer: Vec<u8>,
    pub color_enabled: bool,
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            state: DecodeState::Data,
            line_buffer: Vec::new(),
            color_enabled: true,
        }
    }
}

impl TelnetCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes a fresh connection should be greeted with (§4.E): suppress
    /// go-ahead, and start with echo on (client echoes its own input).
    pub fn greeting() -> Vec<u8> {
        vec![IAC, WILL, OPT_SUPPRESS_GO_AHEAD, IAC, WONT, OPT_ECHO]
    }

    /// `on == true` means the client should echo normally (our echo is
    /// off); `on == false` disables client echo for password prompts.
    pub fn set_echo(&mut self, on: bool) -> Vec<u8> {
        if on {
            vec![IAC, WONT, OPT_ECHO]
        } else {
            vec![IAC, WILL, OPT_ECHO]
        }
    }

    /// Feeds raw inbound bytes. Returns `(lines, negotiation_replies)`.
    pub fn feed(&mut self, bytes: &[u8]) -> (Vec<String>, Vec<u8>) {
        let mut lines = Vec::new();
        let mut replies = Vec::new();

        for &byte in bytes {
            match self.state {
                DecodeState::Data => {
                    if byte == IAC {
                        self.state = DecodeState::SawIac;
                    } else if byte == b'\r' || byte == b'\n' {
                        if !self.line_buffer.is_empty() {
                            lines.push(String::from_utf8_lossy(&self.line_buffer).into_owned());
                            self.line_buffer.clear();
                        }
                    } else {
                        self.line_buffer.push(byte);
                    }
                }
                DecodeState::SawIac => match byte {
                    WILL => self.state = DecodeState::SawWillWontDoDont(NegotiationVerb::Will),
                    WONT => self.state = DecodeState::SawWillWontDoDont(NegotiationVerb::Wont),
                    DO => self.state = DecodeState::SawWillWontDoDont(NegotiationVerb::Do),
                    DONT => self.state = DecodeState::SawWillWontDoDont(NegotiationVerb::Dont),
                    SB => self.state = DecodeState::InSubnegotiation,
                    IAC => {
                        self.line_buffer.push(IAC);
                        self.state = DecodeState::Data;
                    }
                    _ => self.state = DecodeState::Data,
                },
                DecodeState::SawWillWontDoDont(verb) => {
                    replies.extend(self.respond_to_option(verb, byte));
                    self.state = DecodeState::Data;
                }
                DecodeState::InSubnegotiation => {
                    if byte == SE {
                        self.state = DecodeState::Data;
                    }
                }
            }
        }

        (lines, replies)
    }

    fn respond_to_option(&mut self, verb: NegotiationVerb, option: u8) -> Vec<u8> {
        match verb {
            NegotiationVerb::Will => {
                if option == OPT_TERMINAL_TYPE || option == OPT_NAWS {
                    vec![IAC, DO, option]
                } else {
                    vec![IAC, DONT, option]
                }
            }
            NegotiationVerb::Wont => {
                if option == OPT_ECHO {
                    vec![IAC, DONT, OPT_ECHO]
                } else {
                    Vec::new()
                }
            }
            NegotiationVerb::Do => {
                if option == OPT_ECHO {
                    vec![IAC, WILL, OPT_ECHO]
                } else if option == OPT_SUPPRESS_GO_AHEAD {
                    vec![IAC, WILL, OPT_SUPPRESS_GO_AHEAD]
                } else {
                    vec![IAC, WONT, option]
                }
            }
            NegotiationVerb::Dont => {
                if option == OPT_ECHO {
                    vec![IAC, WONT, OPT_ECHO]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Applies the fixed `&X` color-code table to outbound text (§4.E),
    /// stripping codes entirely if the peer doesn't support color, and
    /// normalizing bare `\n` to `\r\n`.
    pub fn encode_outbound(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\n' {
                out.push_str("\r\n");
                continue;
            }
            if c != '&' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some(code) => {
                    if let Some(sgr) = sgr_for_code(code) {
                        if self.color_enabled {
                            out.push_str(sgr);
                        }
                    } else if code == '&' {
                        out.push('&');
                    } else if code == '^' {
                        out.push_str("\r\n");
                    } else if !self.color_enabled {
                        // unknown code with color off: drop both characters
                    } else {
                        out.push('&');
                        out.push(code);
                    }
                }
                None => out.push('&'),
            }
        }
        out
    }
}

fn sgr_for_code(code: char) -> Option<&'static str> {
    Some(match code {
        'k' => "\x1b[0;30m",
        'r' => "\x1b[0;31m",
        'g' => "\x1b[0;32m",
        'y' => "\x1b[0;33m",
        'b' => "\x1b[0;34m",
        'p' => "\x1b[0;35m",
        'c' => "\x1b[0;36m",
        'w' => "\x1b[0;37m",
        'K' => "\x1b[1;30m",
        'R' => "\x1b[1;31m",
        'G' => "\x1b[1;32m",
        'Y' => "\x1b[1;33m",
        'B' => "\x1b[1;34m",
        'P' => "\x1b[1;35m",
        'C' => "\x1b[1;36m",
        'W' => "\x1b[1;37m",
        'f' => "\x1b[5m",
        'u' => "\x1b[4m",
        'v' => "\x1b[7m",
        '0' => "\x1b[40m",
        '1' => "\x1b[41m",
        '2' => "\x1b[42m",
        '3' => "\x1b[43m",
        '4' => "\x1b[44m",
        '5' => "\x1b[45m",
        '6' => "\x1b[46m",
        '7' => "\x1b[47m",
        'E' | 'N' => "\x1b[0m",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiates_terminal_type() {
        let mut codec = TelnetCodec::new();
        let (lines, replies) = codec.feed(&[IAC, WILL, OPT_TERMINAL_TYPE]);
        assert!(lines.is_empty());
        assert_eq!(replies, vec![IAC, DO, OPT_TERMINAL_TYPE]);
    }

    #[test]
    fn will_echo_yields_dont_echo() {
        let mut codec = TelnetCodec::new();
        let (_, replies) = codec.feed(&[IAC, WILL, OPT_ECHO]);
        assert_eq!(replies, vec![IAC, DONT, OPT_ECHO]);
    }

    #[test]
    fn frames_a_line_and_strips_terminators() {
        let mut codec = TelnetCodec::new();
        let (lines, _) = codec.feed(b"look\r\n");
        assert_eq!(lines, vec!["look".to_string()]);
    }

    #[test]
    fn substitutes_color_codes() {
        let codec = TelnetCodec::new();
        assert_eq!(codec.encode_outbound("&Rdanger&N"), "\x1b[1;31mdanger\x1b[0m");
        assert_eq!(codec.encode_outbound("&&"), "&");
    }

    #[test]
    fn strips_color_when_disabled() {
        let mut codec = TelnetCodec::new();
        codec.color_enabled = false;
        assert_eq!(codec.encode_outbound("&Rdanger&N"), "danger");
    }
}
