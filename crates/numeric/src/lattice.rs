//! Pairwise conversion ratings.
//!
//! # Rating rule
//!
//! For a destination `d` and source `s`, let `c = 2` when `d` is complex and `s`
//! is an integer (a complex value holds two components of half its size), and
//! `c = 1` otherwise. The conversion is impossible when:
//!
//! - `d` is less expressive than `s`, or
//! - both share a nature and `d.size / c < s.size`, or
//! - `d` is more expressive but `d.size / c <= s.size`.
//!
//! Otherwise the cost is the number of representable sizes strictly wider than
//! `s` in every nature from `s` up to (excluding) `d`, plus those of `d`'s own
//! nature that are wider than `s` and fit in `d.size / c`.

use crate::kind::{Descriptor, Nature, Numeric};

const N: usize = Numeric::COUNT;

/// Sentinel for impossible pairs inside the table.
const IMPOSSIBLE: i8 = -1;

static RATINGS: [[i8; N]; N] = build();

const fn rate_pair(dst: Descriptor, src: Descriptor) -> i8 {
	let dn = dst.nature as u8;
	let sn = src.nature as u8;
	let c = if dn == Nature::Complex as u8 && sn < Nature::Float as u8 {
		2
	} else {
		1
	};
	let cap = dst.size / c;

	if dn < sn || (dn == sn && cap < src.size) || (dn > sn && cap <= src.size) {
		return IMPOSSIBLE;
	}

	let mut r = 0;
	let mut n = sn;
	while n < dn {
		let sizes = nature_at(n).sizes();
		let mut i = 0;
		while i < sizes.len() {
			if sizes[i] > src.size {
				r += 1;
			}
			i += 1;
		}
		n += 1;
	}

	let sizes = dst.nature.sizes();
	let mut i = 0;
	while i < sizes.len() {
		if sizes[i] > src.size && sizes[i] <= cap {
			r += 1;
		}
		i += 1;
	}

	r
}

const fn nature_at(n: u8) -> Nature {
	match n {
		0 => Nature::Unsigned,
		1 => Nature::Signed,
		2 => Nature::Float,
		_ => Nature::Complex,
	}
}

const fn build() -> [[i8; N]; N] {
	let mut table = [[IMPOSSIBLE; N]; N];
	let mut d = 0;
	while d < N {
		let mut s = 0;
		while s < N {
			table[d][s] = rate_pair(Numeric::ALL[d].descriptor(), Numeric::ALL[s].descriptor());
			s += 1;
		}
		d += 1;
	}
	table
}

/// Rates how well `dst` can hold any value of `src`.
///
/// Returns `None` when the conversion may lose information. Otherwise lower is
/// closer; identical kinds rate `Some(0)`.
#[inline]
pub fn rate(dst: Numeric, src: Numeric) -> Option<u8> {
	let r = RATINGS[dst.index()][src.index()];
	u8::try_from(r).ok()
}
