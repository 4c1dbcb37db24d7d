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

//! An implementation of SLIP-0039: Shamir's Secret Sharing for Mnemonic
//! Codes.
//!
//! A master secret is encrypted under a passphrase, then split two levels
//! deep: into groups, and each group into member shares. Any
//! `group_threshold` groups, each with any `member_threshold` of their own
//! member shares, are enough to reconstruct the original secret. Every
//! share is encoded as a checksummed sequence of words drawn from a
//! 1024-word list for easy transcription.
//!
//! ```
//! use slip39::{generate_mnemonics, combine_mnemonics, Config};
//!
//! let config = Config::new();
//! let master_secret = [0x42u8; 16];
//! let groups = generate_mnemonics(1, &[(2, 3)], &master_secret, b"", 0, false, &config).unwrap();
//!
//! let chosen: Vec<Vec<String>> = groups[0].mnemonics.iter().take(2).cloned().collect();
//! let recovered = combine_mnemonics(&chosen, b"", &config).unwrap();
//! assert_eq!(recovered, master_secret);
//! ```

#[macro_use]
extern crate lazy_static;

pub mod bitpacker;
pub mod cipher;
pub mod config;
pub mod digest;
pub mod ems;
pub mod error;
pub mod field;
pub mod orchestrator;
pub mod recovery;
pub mod rs1024;
pub mod share;
pub mod splitter;
pub mod util;
pub mod wordlist;

pub use config::Config;
pub use ems::EncryptedMasterSecret;
pub use error::{Error, ErrorKind};
pub use orchestrator::{combine_mnemonics, decode_mnemonics, generate_mnemonics, recover_ems, split_ems, GroupShare};
pub use recovery::RecoveryState;
pub use share::Share;
pub use splitter::RawShare;
pub use util::set_random_bytes;
