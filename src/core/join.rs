use std::collections::HashSet;
use log::{debug, info, warn};
use super::{
	node::*,
	ring::*,
	error::{
		*,
		DhtError::*
	}
};

// Pointer write made by a join in progress, holding the old value
enum Change {
	Predecessor(NodeRef, Option<NodeRef>),
	Finger(NodeRef, usize, NodeRef),
	FingerTable(NodeRef, Vec<NodeRef>)
}

impl Network {
	// Figure 6: n.join
	/// Join `node` to the ring `contact` belongs to,
	/// or form a new ring when there is no contact.
	pub fn join(&mut self, node: NodeRef, contact: Option<NodeRef>) -> DhtResult<()> {
		let state = self.state(node)?;
		if !state.finger_table.is_empty() {
			return Err(AlreadyJoined(state.node.id));
		}
		let self_node = state.node.clone();

		match contact {
			Some(c) => {
				if c == node {
					return Err(SelfJoin(self_node.id));
				}
				let contact_node = &self.joined_state(c)?.node;
				debug!("{}: joining {}", self_node, contact_node);
				let mut journal = Vec::new();
				let res = match self.init_finger_table(node, c, &mut journal) {
					Ok(_) => self.update_others(node, &mut journal),
					Err(e) => Err(e)
				};
				if let Err(e) = res {
					warn!("{}: join failed, undoing {} changes: {}", self_node, journal.len(), e);
					self.rollback(journal);
					return Err(e);
				}
			},
			None => {
				// ring with only one node
				let bits = self.space.bits() as usize;
				let s = self.state_mut(node)?;
				s.finger_table = vec![node; bits];
				s.predecessor = Some(node);
			}
		};

		self.register(node)?;
		let successor = self.node(self.get_successor(node)?)?;
		info!("{}: joined with successor {}", self_node, successor);
		Ok(())
	}

	// Figure 6: n.init_finger_table
	fn init_finger_table(&mut self, node: NodeRef, contact: NodeRef, journal: &mut Vec<Change>) -> DhtResult<()> {
		let id = self.id(node)?;
		let successor = self.find_successor(contact, self.space.add(id, 1))?;
		let predecessor = self.get_predecessor(successor)?
			.ok_or(NotJoined(self.id(successor)?))?;

		// the identifier is taken if it sits right before or on its own successor
		if self.id(successor)? == id || self.id(predecessor)? == id {
			return Err(DuplicateIdentifier(id));
		}

		// lookups never pass through the new node, so the whole table
		// is resolved before any pointer is written
		let mut finger_table = vec![successor];
		for i in 0..(self.space.bits() as usize - 1) {
			// entry i + 1 starts at id + 2^(i+1), not id + 2^i as in the
			// paper's loop, so each entry covers its own start
			let start = self.space.finger_start(id, i + 1);
			let current = finger_table[i];
			// reuse the previous finger if it already covers the next start
			let next = if in_range(start, id, self.id(current)?) {
				current
			} else {
				self.find_successor(contact, start)?
			};
			finger_table.push(next);
		}

		let s = self.state_mut(node)?;
		journal.push(Change::FingerTable(node, std::mem::replace(&mut s.finger_table, finger_table)));
		journal.push(Change::Predecessor(node, s.predecessor.replace(predecessor)));
		let s = self.state_mut(successor)?;
		journal.push(Change::Predecessor(successor, s.predecessor.replace(node)));

		let fingers = self.finger_ids(node)?;
		debug!("{}: finger table initialized: {:?}", self.node(node)?, fingers);
		Ok(())
	}

	// Figure 6: n.update_others
	fn update_others(&mut self, node: NodeRef, journal: &mut Vec<Change>) -> DhtResult<()> {
		let id = self.id(node)?;
		for i in 0..self.space.bits() as usize {
			let pred_id = self.space.sub(id, self.space.pow2(i));
			let mut p = self.find_predecessor(node, pred_id)?;
			// find_predecessor(pred_id) stops before a node sitting exactly
			// on pred_id; that node owns the update, unlike in the paper
			let succ = self.get_successor(p)?;
			if self.id(succ)? == pred_id {
				p = succ;
			}
			self.walk_finger_update(p, node, i, journal)?;
		}
		Ok(())
	}

	// Restore every pointer a failed join wrote, newest first
	fn rollback(&mut self, journal: Vec<Change>) {
		for change in journal.into_iter().rev() {
			let res = match change {
				Change::Predecessor(r, old) => self.state_mut(r).map(|s| s.predecessor = old),
				Change::Finger(r, i, old) => self.state_mut(r).map(|s| s.finger_table[i] = old),
				Change::FingerTable(r, old) => self.state_mut(r).map(|s| s.finger_table = old)
			};
			if let Err(e) = res {
				warn!("rollback skipped a change: {}", e);
			}
		}
	}

	// Figure 6: n.update_finger_table
	/// Make `s` the i-th finger of `n` if it is closer,
	/// walking back along predecessors while that holds.
	pub fn update_finger_table(&mut self, n: NodeRef, s: NodeRef, i: usize) -> DhtResult<()> {
		self.walk_finger_update(n, s, i, &mut Vec::new())
	}

	fn walk_finger_update(&mut self, n: NodeRef, s: NodeRef, i: usize, journal: &mut Vec<Change>) -> DhtResult<()> {
		let s_node = self.node(s)?.clone();
		let mut visited = HashSet::new();
		let mut current = n;

		while visited.insert(current) {
			let state = self.joined_state(current)?;
			let finger = *state.finger_table.get(i).ok_or(InvalidFingerIndex(i))?;
			if !in_interval(s_node.id, state.node.id, self.id(finger)?, true) {
				break;
			}
			let pred = state.predecessor;
			debug!("{}: finger[{}] set to {}", state.node, i, s_node);
			let old = std::mem::replace(&mut self.state_mut(current)?.finger_table[i], s);
			journal.push(Change::Finger(current, i, old));

			match pred {
				Some(p) if p != current => current = p,
				_ => break
			};
		}
		Ok(())
	}
}
