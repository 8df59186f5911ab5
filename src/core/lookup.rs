use log::{debug, warn};
use super::{
	node::*,
	ring::*,
	error::{
		*,
		DhtError::*
	}
};

impl Network {
	// Figure 4: n.find_successor
	/// Node owning `id`, asking `from` first
	pub fn find_successor(&self, from: NodeRef, id: Digest) -> DhtResult<NodeRef> {
		let n = self.find_predecessor(from, id)?;
		self.get_successor(n)
	}

	// Figure 4: n.find_predecessor
	pub fn find_predecessor(&self, from: NodeRef, id: Digest) -> DhtResult<NodeRef> {
		let id = self.space.check(id)?;
		let origin = &self.joined_state(from)?.node;
		debug!("{}: find_predecessor({})", origin, id);

		let mut n = from;
		let mut hops = 0;
		// stop when id in (n, succ]
		loop {
			let n_id = self.id(n)?;
			let succ_id = self.id(self.get_successor(n)?)?;
			if in_interval(id, n_id, succ_id, true) {
				break;
			}
			if hops >= self.config.max_lookup_hops {
				warn!("{}: find_predecessor({}) exceeded {} hops", origin, id, hops);
				return Err(RoutingFailure { id, hops });
			}
			debug!("{}: find_predecessor range ({}, {}]", origin, n_id, succ_id);
			n = self.closest_preceding_finger(n, id)?;
			hops += 1;
		}
		let result = self.node(n)?;
		debug!("{}: find_predecessor({}) returns {} after {} hops", origin, id, result, hops);
		Ok(n)
	}

	// Figure 4: n.closest_preceding_finger
	pub fn closest_preceding_finger(&self, at: NodeRef, id: Digest) -> DhtResult<NodeRef> {
		let state = self.joined_state(at)?;
		for f in state.finger_table.iter().rev() {
			if in_range(self.id(*f)?, state.node.id, id) {
				return Ok(*f);
			}
		}
		Ok(at)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Config;

	// Ring {1, 3, 6} on 3 bits with hand-written finger tables (Figure 3b style)
	fn wired_ring() -> DhtResult<(Network, Vec<NodeRef>)> {
		let mut net = Network::new(Config {
			bits: 3,
			..Config::default()
		})?;
		let refs = [1, 3, 6].iter()
			.map(|id| net.add_node(Node { id: *id, name: format!("n{}", id) }))
			.collect::<DhtResult<Vec<_>>>()?;
		let (n1, n3, n6) = (refs[0], refs[1], refs[2]);
		let wiring = [
			(n1, n6, vec![n3, n3, n6]),
			(n3, n1, vec![n6, n6, n1]),
			(n6, n3, vec![n1, n1, n3])
		];
		for (r, pred, fingers) in wiring {
			let s = net.state_mut(r)?;
			s.predecessor = Some(pred);
			s.finger_table = fingers;
		}
		Ok((net, refs))
	}

	#[test]
	fn test_closest_preceding_finger() -> DhtResult<()> {
		let (net, refs) = wired_ring()?;
		let (n1, n3, n6) = (refs[0], refs[1], refs[2]);
		assert_eq!(net.closest_preceding_finger(n1, 7)?, n6);
		assert_eq!(net.closest_preceding_finger(n1, 5)?, n3);
		// nothing strictly between 1 and 2
		assert_eq!(net.closest_preceding_finger(n1, 2)?, n1);
		assert_eq!(net.closest_preceding_finger(n6, 5)?, n3);
		Ok(())
	}

	#[test]
	fn test_find_successor() -> DhtResult<()> {
		let (net, refs) = wired_ring()?;
		let (n1, n3, n6) = (refs[0], refs[1], refs[2]);
		for from in refs.iter() {
			assert_eq!(net.find_predecessor(*from, 2)?, n1);
			assert_eq!(net.find_successor(*from, 2)?, n3);
			assert_eq!(net.find_successor(*from, 3)?, n3);
			assert_eq!(net.find_successor(*from, 4)?, n6);
			assert_eq!(net.find_successor(*from, 7)?, n1);
			assert_eq!(net.find_successor(*from, 0)?, n1);
		}
		assert_eq!(net.find_successor(n1, 8), Err(IdOutOfRange { id: 8, bits: 3 }));
		Ok(())
	}

	#[test]
	fn test_routing_failure() -> DhtResult<()> {
		let (mut net, refs) = wired_ring()?;
		let (n1, n3, n6) = (refs[0], refs[1], refs[2]);
		net.config.max_lookup_hops = 1;
		// one hop through the finger pointing at n6
		assert_eq!(net.find_successor(n1, 7)?, n1);

		// a stale table needs two hops and hits the ceiling
		net.state_mut(n1)?.finger_table = vec![n3, n3, n3];
		assert_eq!(net.find_successor(n1, 7), Err(RoutingFailure { id: 7, hops: 1 }));
		net.config.max_lookup_hops = 2;
		assert_eq!(net.find_predecessor(n1, 7)?, n6);
		Ok(())
	}
}
