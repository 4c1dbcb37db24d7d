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

//! Incremental accumulator for shares entered one at a time, e.g. by a user
//! typing mnemonics into a recovery wizard. Tracks, per group, how many
//! distinct member shares have been seen and whether that group has reached
//! its own threshold; once enough groups are complete the master secret can
//! be reconstructed.

use std::collections::BTreeMap;

use crate::bitpacker::BitPacker;
use crate::config::Config;
use crate::ems::EncryptedMasterSecret;
use crate::error::{Error, ErrorKind};
use crate::share::Share;
use crate::splitter::{self, RawShare};
use crate::wordlist::WORDLIST;

/// Shares accumulated so far for a single group.
#[derive(Debug, Default)]
struct ShareGroup {
	member_threshold: u8,
	members: BTreeMap<u8, Vec<u8>>,
}

impl ShareGroup {
	fn is_complete(&self) -> bool {
		self.members.len() >= self.member_threshold as usize
	}
}

/// Accumulates shares across one or more recovery attempts until enough
/// groups are complete to reconstruct the master secret.
#[derive(Debug)]
pub struct RecoveryState {
	config: Config,
	identifier: Option<u16>,
	extendable: Option<bool>,
	iteration_exponent: Option<u8>,
	group_threshold: Option<u8>,
	group_count: Option<u8>,
	groups: BTreeMap<u8, ShareGroup>,
}

impl RecoveryState {
	/// Start a fresh, empty recovery session.
	pub fn new(config: Config) -> Self {
		RecoveryState {
			config,
			identifier: None,
			extendable: None,
			iteration_exponent: None,
			group_threshold: None,
			group_count: None,
			groups: BTreeMap::new(),
		}
	}

	/// Parse and add a mnemonic, normalizing it first.
	pub fn add_mnemonic_str(&mut self, mnemonic: &str) -> Result<(), Error> {
		let share = Share::from_mnemonic_str(mnemonic, &self.config)?;
		self.add_share(share)
	}

	/// Add an already-parsed share, checking it against the common
	/// parameters established by any shares added previously.
	pub fn add_share(&mut self, share: Share) -> Result<(), Error> {
		match self.identifier {
			Some(id) if id != share.identifier => {
				return Err(ErrorKind::Mnemonic(
					"Share identifier does not match previously entered shares.".to_string(),
				))?;
			}
			_ => self.identifier = Some(share.identifier),
		}
		match self.extendable {
			Some(e) if e != share.extendable => {
				return Err(ErrorKind::Mnemonic(
					"Share extendable-backup flag does not match previously entered shares.".to_string(),
				))?;
			}
			_ => self.extendable = Some(share.extendable),
		}
		match self.iteration_exponent {
			Some(e) if e != share.iteration_exponent => {
				return Err(ErrorKind::Mnemonic(
					"Share iteration exponent does not match previously entered shares.".to_string(),
				))?;
			}
			_ => self.iteration_exponent = Some(share.iteration_exponent),
		}
		match self.group_threshold {
			Some(t) if t != share.group_threshold => {
				return Err(ErrorKind::Mnemonic(
					"Share group threshold does not match previously entered shares.".to_string(),
				))?;
			}
			_ => self.group_threshold = Some(share.group_threshold),
		}
		match self.group_count {
			Some(c) if c != share.group_count => {
				return Err(ErrorKind::Mnemonic(
					"Share group count does not match previously entered shares.".to_string(),
				))?;
			}
			_ => self.group_count = Some(share.group_count),
		}
		if share.group_index >= share.group_count {
			return Err(ErrorKind::Mnemonic(
				"Share group index is out of range for the share's group count.".to_string(),
			))?;
		}

		let group = self.groups.entry(share.group_index).or_insert_with(ShareGroup::default);
		if group.member_threshold == 0 {
			group.member_threshold = share.member_threshold;
		} else if group.member_threshold != share.member_threshold {
			return Err(ErrorKind::Mnemonic(
				"Share member threshold does not match previously entered shares for this group.".to_string(),
			))?;
		}

		match group.members.get(&share.member_index) {
			Some(existing) if existing != &share.value => {
				return Err(ErrorKind::Mnemonic(
					"A different share was already entered for this member index.".to_string(),
				))?;
			}
			_ => {
				group.members.insert(share.member_index, share.value.clone());
			}
		}
		Ok(())
	}

	/// True if a value-equal share has already been recorded: every field,
	/// including the share bytes, matches (spec §4.8/§8.8 duplicate
	/// coalescence is by full value equality, not just position).
	pub fn has(&self, share: &Share) -> bool {
		self.identifier == Some(share.identifier)
			&& self.extendable == Some(share.extendable)
			&& self.iteration_exponent == Some(share.iteration_exponent)
			&& self.group_threshold == Some(share.group_threshold)
			&& self.group_count == Some(share.group_count)
			&& self
				.groups
				.get(&share.group_index)
				.map(|g| {
					g.member_threshold == share.member_threshold
						&& g.members.get(&share.member_index) == Some(&share.value)
				})
				.unwrap_or(false)
	}

	/// True if `share`'s common parameters are consistent with everything
	/// accumulated so far: the read-only complement of `add_share`'s
	/// rejection checks, for probing a share before committing it.
	pub fn matches(&self, share: &Share) -> bool {
		if let Some(id) = self.identifier {
			if id != share.identifier {
				return false;
			}
		}
		if let Some(e) = self.extendable {
			if e != share.extendable {
				return false;
			}
		}
		if let Some(e) = self.iteration_exponent {
			if e != share.iteration_exponent {
				return false;
			}
		}
		if let Some(t) = self.group_threshold {
			if t != share.group_threshold {
				return false;
			}
		}
		if let Some(c) = self.group_count {
			if c != share.group_count {
				return false;
			}
		}
		if share.group_index >= share.group_count {
			return false;
		}
		if let Some(group) = self.groups.get(&share.group_index) {
			if group.member_threshold != 0 && group.member_threshold != share.member_threshold {
				return false;
			}
			if let Some(existing) = group.members.get(&share.member_index) {
				if existing != &share.value {
					return false;
				}
			}
		}
		true
	}

	/// (members seen, members needed) for the given group, if anything has
	/// been recorded for it yet.
	pub fn group_status(&self, group_index: u8) -> Option<(usize, u8)> {
		self.groups.get(&group_index).map(|g| (g.members.len(), g.member_threshold))
	}

	/// True if the given group alone has reached its member threshold.
	pub fn group_is_complete(&self, group_index: u8) -> bool {
		self.groups.get(&group_index).map(|g| g.is_complete()).unwrap_or(false)
	}

	/// Number of groups that have independently reached their member threshold.
	pub fn groups_complete(&self) -> usize {
		self.groups.values().filter(|g| g.is_complete()).count()
	}

	/// True once enough complete groups have been seen to attempt recovery.
	pub fn is_complete(&self) -> bool {
		match self.group_threshold {
			Some(t) => self.groups_complete() >= t as usize,
			None => false,
		}
	}

	/// The word sequence common to every mnemonic in the given group, useful
	/// as a sanity check while a user is entering shares. Returns `None`
	/// until enough metadata has been learned from at least one share.
	pub fn group_prefix(&self, group_index: u8) -> Option<Vec<String>> {
		let identifier = self.identifier?;
		let extendable = self.extendable?;
		let iteration_exponent = self.iteration_exponent?;
		let group_threshold = self.group_threshold?;
		let group_count = self.group_count?;

		let mut bp = BitPacker::new();
		bp.append_u16(identifier, self.config.id_length_bits).ok()?;
		bp.append_u8(extendable as u8, self.config.extendable_flag_length_bits).ok()?;
		bp.append_u8(iteration_exponent, self.config.iteration_exp_length_bits).ok()?;
		bp.append_u8(group_index, 4).ok()?;
		bp.append_u8(group_threshold - 1, 4).ok()?;
		bp.append_u8(group_count - 1, 4).ok()?;

		let prefix_bits = self.config.group_prefix_length_words as usize * self.config.radix_bits as usize;
		let mut words = Vec::with_capacity(self.config.group_prefix_length_words as usize);
		for i in (0..prefix_bits).step_by(self.config.radix_bits as usize) {
			let idx = bp.get_u32(i, self.config.radix_bits as usize).ok()?;
			words.push(WORDLIST[idx as usize].clone());
		}
		Some(words)
	}

	/// Reconstruct the master secret from the accumulated shares, decrypting
	/// it with `passphrase`. Fails if recovery is not yet [`Self::is_complete`].
	pub fn recover(&self, passphrase: &[u8]) -> Result<Vec<u8>, Error> {
		let identifier = self
			.identifier
			.ok_or_else(|| ErrorKind::Mnemonic("No shares have been entered.".to_string()))?;
		let extendable = self.extendable.unwrap();
		let iteration_exponent = self.iteration_exponent.unwrap();
		let group_threshold = self.group_threshold.unwrap();

		if !self.is_complete() {
			return Err(ErrorKind::Mnemonic(format!(
				"Not enough complete groups to recover the master secret: need {}, have {}.",
				group_threshold,
				self.groups_complete(),
			)))?;
		}

		let mut group_shares: Vec<RawShare> = vec![];
		for (&group_index, group) in self.groups.iter() {
			if !group.is_complete() {
				continue;
			}
			let member_shares: Vec<RawShare> = group
				.members
				.iter()
				.map(|(&x, data)| RawShare { x, data: data.clone() })
				.collect();
			let group_secret = splitter::recover(group.member_threshold, &member_shares, &self.config)?;
			group_shares.push(RawShare {
				x: group_index,
				data: group_secret,
			});
			if group_shares.len() >= group_threshold as usize {
				break;
			}
		}

		let ciphertext = splitter::recover(group_threshold, &group_shares, &self.config)?;
		let ems = EncryptedMasterSecret {
			identifier,
			extendable,
			iteration_exponent,
			ciphertext,
		};
		ems.decrypt(passphrase, &self.config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::orchestrator;

	#[test]
	fn single_group_recovery_round_trip() {
		let config = Config::new();
		let secret = [0x42u8; 16];
		let groups = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &config).unwrap();

		let mut state = RecoveryState::new(config.clone());
		for mnemonic in groups[0].mnemonics.iter().take(3) {
			state.add_mnemonic_str(&mnemonic.join(" ")).unwrap();
		}
		assert!(state.is_complete());
		let recovered = state.recover(b"").unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn incomplete_group_refuses_recovery() {
		let config = Config::new();
		let secret = [0x11u8; 16];
		let groups = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &config).unwrap();

		let mut state = RecoveryState::new(config);
		for mnemonic in groups[0].mnemonics.iter().take(2) {
			state.add_mnemonic_str(&mnemonic.join(" ")).unwrap();
		}
		assert!(!state.is_complete());
		assert!(state.recover(b"").is_err());
	}

	#[test]
	fn multi_group_recovery_round_trip() {
		let config = Config::new();
		let secret = [0x77u8; 16];
		let groups =
			orchestrator::generate_mnemonics(2, &[(2, 3), (3, 5)], &secret, b"pw", 0, false, &config).unwrap();

		let mut state = RecoveryState::new(config);
		for mnemonic in groups[0].mnemonics.iter().take(2) {
			state.add_mnemonic_str(&mnemonic.join(" ")).unwrap();
		}
		for mnemonic in groups[1].mnemonics.iter().take(3) {
			state.add_mnemonic_str(&mnemonic.join(" ")).unwrap();
		}
		assert!(state.is_complete());
		let recovered = state.recover(b"pw").unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn has_requires_full_value_equality() {
		let config = Config::new();
		let secret = [0x55u8; 16];
		let groups = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &config).unwrap();

		let first = crate::share::Share::from_mnemonic(&groups[0].mnemonics[0], &config).unwrap();
		let second = crate::share::Share::from_mnemonic(&groups[0].mnemonics[1], &config).unwrap();

		let mut state = RecoveryState::new(config);
		state.add_share(first.clone()).unwrap();

		assert!(state.has(&first));
		// same group/member-threshold parameters, different member index and value
		assert!(!state.has(&second));

		// same member index, tampered value: still must not count as a match
		let mut tampered = first.clone();
		tampered.value[0] ^= 1;
		assert!(!state.has(&tampered));
	}

	#[test]
	fn matches_probes_without_mutating_state() {
		let config = Config::new();
		let secret = [0x66u8; 16];
		let groups =
			orchestrator::generate_mnemonics(2, &[(2, 3), (3, 5)], &secret, b"", 0, false, &config).unwrap();

		let share_a = crate::share::Share::from_mnemonic(&groups[0].mnemonics[0], &config).unwrap();
		let share_b = crate::share::Share::from_mnemonic(&groups[1].mnemonics[0], &config).unwrap();

		let mut state = RecoveryState::new(config.clone());
		state.add_share(share_a.clone()).unwrap();

		// a second share from the same group/session matches the accumulated parameters
		assert!(state.matches(&share_b));

		// a share from an unrelated session (different identifier) does not
		let other = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &Config::new()).unwrap();
		let foreign = crate::share::Share::from_mnemonic(&other[0].mnemonics[0], &config).unwrap();
		assert!(!state.matches(&foreign));

		// matches() never mutates: groups_complete is unaffected by the probes above
		assert_eq!(state.groups_complete(), 0);
	}

	#[test]
	fn conflicting_share_is_rejected() {
		let config = Config::new();
		let secret = [0x99u8; 16];
		let groups = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &config).unwrap();

		let mut state = RecoveryState::new(config);
		state.add_mnemonic_str(&groups[0].mnemonics[0].join(" ")).unwrap();
		// A mnemonic from an unrelated session will very likely carry a
		// different identifier and so should be rejected outright.
		let other = orchestrator::generate_mnemonics(1, &[(3, 5)], &secret, b"", 0, false, &Config::new()).unwrap();
		assert!(state
			.add_mnemonic_str(&other[0].mnemonics[0].join(" "))
			.is_err());
	}
}
