// Copyright 2019 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Operations that allow packing bits from primitives into a bitvec.
//! Slower, but easier to follow and modify than manual bit twiddling.
//! Big-endian throughout, matching the share wire format.

use bitvec::order::Msb0;
use bitvec::vec::BitVec;

use crate::error::{Error, ErrorKind};

/// Simple struct that wraps a bitvec and defines packing operations on it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitPacker {
	bv: BitVec<u8, Msb0>,
}

impl BitPacker {
	/// Create a new, empty bitpacker
	pub fn new() -> Self {
		BitPacker { bv: BitVec::new() }
	}

	/// Append num_bits of zero padding to the internal bitvec
	pub fn append_padding(&mut self, num_bits: u8) {
		for _ in 0..num_bits {
			self.bv.push(false);
		}
	}

	/// Append each element of a u8 vec to the bitvec
	pub fn append_vec_u8(&mut self, data: &[u8]) -> Result<(), Error> {
		for &b in data {
			self.append_u8(b, 8)?;
		}
		Ok(())
	}

	/// Append first num_bits of a u32 to the bitvec. num_bits must be <= 32
	pub fn append_u32(&mut self, val: u32, num_bits: u8) -> Result<(), Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 32".to_string(),
			))?;
		}
		for i in (0u8..num_bits).rev() {
			self.bv.push((val >> i) & 1 == 1);
		}
		Ok(())
	}

	/// Append first num_bits of a u16 to the bitvec. num_bits must be <= 16
	pub fn append_u16(&mut self, val: u16, num_bits: u8) -> Result<(), Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 16".to_string(),
			))?;
		}
		self.append_u32(u32::from(val), num_bits)
	}

	/// Append first num_bits of a u8 to the bitvec, num_bits must be <= 8
	pub fn append_u8(&mut self, val: u8, num_bits: u8) -> Result<(), Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 8".to_string(),
			))?;
		}
		self.append_u32(u32::from(val), num_bits)
	}

	/// Return length of internal bit vector, in bits
	pub fn len(&self) -> usize {
		self.bv.len()
	}

	/// True if the bitpacker holds no bits
	pub fn is_empty(&self) -> bool {
		self.bv.is_empty()
	}

	fn get_bits(&self, start_bit: usize, num_bits: usize) -> Result<&bitvec::slice::BitSlice<u8, Msb0>, Error> {
		if start_bit + num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(format!(
				"Attempt to read {} bits starting at {}, but bitpacker only holds {} bits",
				num_bits,
				start_bit,
				self.bv.len(),
			)))?;
		}
		Ok(&self.bv[start_bit..start_bit + num_bits])
	}

	/// Read num_bits (<=32) starting at start_bit as a big-endian integer
	pub fn get_u32(&self, start_bit: usize, num_bits: usize) -> Result<u32, Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to unpack must be <= 32".to_string(),
			))?;
		}
		let bits = self.get_bits(start_bit, num_bits)?;
		let mut val: u32 = 0;
		for b in bits {
			val = (val << 1) | u32::from(*b);
		}
		Ok(val)
	}

	/// Read num_bits (<=16) starting at start_bit as a big-endian integer
	pub fn get_u16(&self, start_bit: usize, num_bits: usize) -> Result<u16, Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to unpack must be <= 16".to_string(),
			))?;
		}
		Ok(self.get_u32(start_bit, num_bits)? as u16)
	}

	/// Read num_bits (<=8) starting at start_bit as a big-endian integer
	pub fn get_u8(&self, start_bit: usize, num_bits: usize) -> Result<u8, Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to unpack must be <= 8".to_string(),
			))?;
		}
		Ok(self.get_u32(start_bit, num_bits)? as u8)
	}

	/// Read num_bytes whole bytes starting at start_bit (start_bit + 8*num_bytes must be byte aligned within range)
	pub fn get_vec_u8(&self, start_bit: usize, num_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut out = Vec::with_capacity(num_bytes);
		for i in 0..num_bytes {
			out.push(self.get_u8(start_bit + i * 8, 8)?);
		}
		Ok(out)
	}

	/// Keep only the bits in the half-open range [start_bit, end_bit), discarding the rest.
	pub fn split_out(&mut self, start_bit: usize, end_bit: usize) {
		let bits: BitVec<u8, Msb0> = self.bv[start_bit..end_bit].to_bitvec();
		self.bv = bits;
	}

	/// Remove the leading num_bits, which must all be zero (high-order padding).
	pub fn remove_padding(&mut self, num_bits: usize) -> Result<(), Error> {
		if num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(
				"Attempt to remove more padding bits than the bitpacker holds".to_string(),
			))?;
		}
		if self.bv[0..num_bits].any() {
			return Err(ErrorKind::Padding)?;
		}
		let rest: BitVec<u8, Msb0> = self.bv[num_bits..].to_bitvec();
		self.bv = rest;
		Ok(())
	}

	/// Left-pad with zero bits until the total length is a multiple of `modulus`.
	pub fn normalize(&mut self, modulus: usize) {
		let rem = self.bv.len() % modulus;
		if rem != 0 {
			let pad = modulus - rem;
			let mut padded: BitVec<u8, Msb0> = BitVec::with_capacity(self.bv.len() + pad);
			for _ in 0..pad {
				padded.push(false);
			}
			padded.extend_from_bitslice(&self.bv);
			self.bv = padded;
		}
	}
}
