//! Stream framing for the Meshtastic serial API.
//!
//! In PROTO serial mode the radio wraps every protobuf message as:
//!
//!   `0x94 0xC3 <len_hi> <len_lo> <protobuf bytes>`
//!
//! [`StreamFramer`] is fed arbitrary read chunks and yields whole payloads once
//! available. Debug console text interleaved between frames is skipped by
//! scanning for the next header; implausible lengths drop a byte and resync.
use bytes::{Buf, BytesMut};

pub const START1: u8 = 0x94;
pub const START2: u8 = 0xC3;
/// Largest payload the firmware will emit or accept.
pub const MAX_PAYLOAD: usize = 512;

const HEADER_LEN: usize = 4;

pub struct StreamFramer {
    buf: BytesMut,
}

impl StreamFramer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(1024),
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Bytes currently buffered and not yet part of a returned frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Extract the next complete payload, if one is buffered.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        loop {
            if self.buf.len() < 2 {
                return None;
            }
            if !(self.buf[0] == START1 && self.buf[1] == START2) {
                // Realign to the next possible header byte
                match self.buf.iter().skip(1).position(|&b| b == START1) {
                    Some(pos) => self.buf.advance(pos + 1),
                    None => {
                        self.buf.clear();
                        return None;
                    }
                }
                continue;
            }
            if self.buf.len() < HEADER_LEN {
                return None;
            }
            let declared = ((self.buf[2] as usize) << 8) | (self.buf[3] as usize);
            if declared == 0 || declared > MAX_PAYLOAD {
                self.buf.advance(1);
                continue;
            }
            if self.buf.len() < HEADER_LEN + declared {
                return None;
            }
            self.buf.advance(HEADER_LEN);
            return Some(self.buf.split_to(declared).to_vec());
        }
    }
}

impl Default for StreamFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap an encoded protobuf payload in the serial header.
pub fn encode_frame(payload: &[u8]) -> Option<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD {
        return None;
    }
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(START1);
    out.push(START2);
    out.push(((payload.len() >> 8) & 0xFF) as u8);
    out.push((payload.len() & 0xFF) as u8);
    out.extend_from_slice(payload);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_frame_split_across_pushes() {
        let frame = encode_frame(b"hello").unwrap();
        let mut f = StreamFramer::new();
        f.push(&frame[..3]);
        assert!(f.next_frame().is_none());
        f.push(&frame[3..]);
        assert_eq!(f.next_frame().as_deref(), Some(&b"hello"[..]));
        assert!(f.next_frame().is_none());
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn skips_console_noise_between_frames() {
        let mut stream = b"INFO | boot ok\r\n".to_vec();
        stream.extend(encode_frame(&[1, 2, 3]).unwrap());
        stream.extend_from_slice(b"\x94garbage");
        stream.extend(encode_frame(&[4]).unwrap());
        let mut f = StreamFramer::new();
        f.push(&stream);
        assert_eq!(f.next_frame(), Some(vec![1, 2, 3]));
        assert_eq!(f.next_frame(), Some(vec![4]));
        assert!(f.next_frame().is_none());
    }

    #[test]
    fn oversize_length_resyncs() {
        let mut stream = vec![START1, START2, 0x7F, 0xFF];
        stream.extend(encode_frame(&[9, 9]).unwrap());
        let mut f = StreamFramer::new();
        f.push(&stream);
        assert_eq!(f.next_frame(), Some(vec![9, 9]));
    }

    #[test]
    fn keeps_trailing_header_byte() {
        let frame = encode_frame(&[7]).unwrap();
        let mut f = StreamFramer::new();
        f.push(b"noise");
        f.push(&frame[..1]);
        assert!(f.next_frame().is_none());
        f.push(&frame[1..]);
        assert_eq!(f.next_frame(), Some(vec![7]));
    }

    #[test]
    fn refuses_oversize_payload() {
        assert!(encode_frame(&vec![0u8; MAX_PAYLOAD + 1]).is_none());
    }
}
