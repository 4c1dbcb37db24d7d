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

//! The word <-> index bijection used by the mnemonic codec. See
//! DESIGN.md for why this particular dictionary isn't the published
//! SLIP-0039 English wordlist byte-for-byte.

use std::collections::HashMap;

lazy_static! {
	/// Ordered list of dictionary words; position is the RS1024/bit-packing index.
	pub static ref WORDLIST: Vec<String> =
		include_str!("wordlists/en.txt")
			.split_whitespace()
			.map(|s| s.into())
			.collect();
	/// Reverse lookup from word to index.
	pub static ref WORD_INDEX_MAP: HashMap<String, usize> = {
		let mut retval = HashMap::new();
		for (i, item) in WORDLIST.iter().enumerate() {
			retval.insert(item.to_owned(), i);
		}
		retval
	};
}
