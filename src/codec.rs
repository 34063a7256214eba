//! Fixed-layout wire codec for telemetry datagrams
//!
//! # Layout
//!
//! Every datagram is exactly [`PACKET_SIZE`] bytes, little-endian, with no
//! header, padding or checksum:
//!
//! ```text
//! offset  field        type
//! 0       packet_id    i32
//! 4       vel_x        f32
//! 8       vel_y        f32
//! 12      vel_z        f32
//! 16      acc_x        f32
//! 20      acc_y        f32
//! 24      acc_z        f32
//! 28      pitch        f32
//! 32      yaw          f32
//! 36      roll         f32
//! 40      pitch_vel    f32
//! 44      yaw_vel      f32
//! 48      roll_vel     f32
//! 52      pitch_acc    f32
//! 56      yaw_acc      f32
//! 60      roll_acc     f32
//! 64      slip_angle   f32
//! 68      reserved     u32 (zero on encode, ignored on decode)
//! ```
//!
//! Decoding rejects any other length and never inspects field contents, so
//! NaN and infinities pass through untouched.

use crate::DecodeError;
use crate::types::TelemetrySample;

/// Number of `f32` channels following the packet ID.
pub const FLOAT_FIELDS: usize = 16;

/// Trailing reserved word after the last channel.
const RESERVED_SIZE: usize = 4;

/// Exact datagram size in bytes.
pub const PACKET_SIZE: usize = 4 + FLOAT_FIELDS * 4 + RESERVED_SIZE;

/// Encode a sample into a fresh buffer.
pub fn encode(sample: &TelemetrySample) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    encode_into(sample, &mut buf);
    buf
}

/// Encode a sample into a caller-provided buffer.
pub fn encode_into(sample: &TelemetrySample, buf: &mut [u8; PACKET_SIZE]) {
    buf[0..4].copy_from_slice(&sample.packet_id.to_le_bytes());

    for (chunk, value) in buf[4..].chunks_exact_mut(4).zip(float_fields(sample)) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }

    buf[PACKET_SIZE - RESERVED_SIZE..].fill(0);
}

/// Decode one datagram.
pub fn decode(bytes: &[u8]) -> Result<TelemetrySample, DecodeError> {
    if bytes.len() != PACKET_SIZE {
        return Err(DecodeError::SizeMismatch { expected: PACKET_SIZE, actual: bytes.len() });
    }

    let mut words = bytes.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]);
    // Length is checked above, so every read below hits a real word
    let mut next = || words.next().unwrap_or_default();

    let packet_id = i32::from_le_bytes(next());
    let mut float = || f32::from_le_bytes(next());

    Ok(TelemetrySample {
        packet_id,
        vel_x: float(),
        vel_y: float(),
        vel_z: float(),
        acc_x: float(),
        acc_y: float(),
        acc_z: float(),
        pitch: float(),
        yaw: float(),
        roll: float(),
        pitch_vel: float(),
        yaw_vel: float(),
        roll_vel: float(),
        pitch_acc: float(),
        yaw_acc: float(),
        roll_acc: float(),
        slip_angle: float(),
    })
}

fn float_fields(s: &TelemetrySample) -> [f32; FLOAT_FIELDS] {
    [
        s.vel_x,
        s.vel_y,
        s.vel_z,
        s.acc_x,
        s.acc_y,
        s.acc_z,
        s.pitch,
        s.yaw,
        s.roll,
        s.pitch_vel,
        s.yaw_vel,
        s.roll_vel,
        s.pitch_acc,
        s.yaw_acc,
        s.roll_acc,
        s.slip_angle,
    ]
}
