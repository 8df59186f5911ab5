use chord_ring::core::{
	ring::Digest,
	Config,
	Network,
	Node,
	NodeRef
};
use rand::{Rng, seq::index};

pub fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

pub fn network(bits: u32) -> Network {
	Network::new(Config {
		bits,
		..Config::default()
	}).unwrap()
}

// Add nodes with the given ids and join them in order through the first one
pub fn build_ring(net: &mut Network, ids: &[Digest]) -> anyhow::Result<Vec<NodeRef>> {
	let mut refs = Vec::new();
	for id in ids {
		let r = net.add_node(Node {
			id: *id,
			name: format!("n{}", id)
		})?;
		net.join(r, refs.first().copied())?;
		refs.push(r);
	}
	Ok(refs)
}

// Random distinct ids joined through random existing members
pub fn build_random_ring<T: Rng>(rng: &mut T, net: &mut Network, count: usize) -> anyhow::Result<Vec<NodeRef>> {
	let size = net.space().size().min(usize::MAX as u128) as usize;
	let mut refs: Vec<NodeRef> = Vec::new();
	for id in index::sample(rng, size, count.min(size)).into_iter() {
		let r = net.add_node(Node {
			id: id as Digest,
			name: format!("n{}", id)
		})?;
		let contact = if refs.is_empty() {
			None
		} else {
			Some(refs[rng.gen_range(0..refs.len())])
		};
		net.join(r, contact)?;
		refs.push(r);
	}
	Ok(refs)
}

pub fn ids(net: &Network, refs: &[NodeRef]) -> Vec<Digest> {
	refs.iter().map(|r| net.id(*r).unwrap()).collect()
}
