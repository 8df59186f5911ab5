use std::default::Default;

#[derive(Clone, Debug)]
pub struct Config {
	/// width of the identifier space (ring size is 2^bits)
	pub bits: u32,
	// hop ceiling for find_predecessor on an inconsistent ring
	pub max_lookup_hops: usize
}

impl Default for Config {
	fn default() -> Self {
		Self {
			bits: 8,
			max_lookup_hops: 1024
		}
	}
}
