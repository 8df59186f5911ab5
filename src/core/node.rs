use std::collections::BTreeMap;
use log::debug;
use super::{
	ring::*,
	config::*,
	error::{
		*,
		DhtError::*
	}
};

// Data part of the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	pub id: Digest,
	pub name: String
}

impl std::fmt::Display for Node {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Node({}, {})", self.id, self.name)
	}
}

/// Stable handle of a node inside a `Network`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
	pub fn index(&self) -> usize {
		self.0
	}
}

// Routing state of a node
#[derive(Debug, Clone)]
pub(crate) struct NodeState {
	pub(crate) node: Node,
	pub(crate) predecessor: Option<NodeRef>,
	// The first entry is the successor.
	// Empty until the node joins a ring.
	pub(crate) finger_table: Vec<NodeRef>
}

/// All nodes of one run.
///
/// Contacting another node is a direct call into this arena.
/// Routing only follows the successor, predecessor and finger pointers of each node;
/// the registry of members is kept for diagnostics and tests.
pub struct Network {
	pub(crate) space: IdSpace,
	pub(crate) config: Config,
	pub(crate) nodes: Vec<NodeState>,
	registry: BTreeMap<Digest, NodeRef>
}

impl Network {
	pub fn new(config: Config) -> DhtResult<Self> {
		let space = IdSpace::new(config.bits)?;
		Ok(Network {
			space,
			config,
			nodes: Vec::new(),
			registry: BTreeMap::new()
		})
	}

	pub fn space(&self) -> &IdSpace {
		&self.space
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Add a node that has not joined any ring yet
	pub fn add_node(&mut self, node: Node) -> DhtResult<NodeRef> {
		self.space.check(node.id)?;
		let r = NodeRef(self.nodes.len());
		debug!("{}: created", node);
		self.nodes.push(NodeState {
			node,
			predecessor: None,
			finger_table: Vec::new()
		});
		Ok(r)
	}

	/// Hash the name into an identifier and add the node
	pub fn create_node(&mut self, name: &str) -> DhtResult<NodeRef> {
		let node = super::construct_node(name, &self.space);
		self.add_node(node)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub(crate) fn state(&self, r: NodeRef) -> DhtResult<&NodeState> {
		self.nodes.get(r.0).ok_or(UnknownNode(r.0))
	}

	pub(crate) fn state_mut(&mut self, r: NodeRef) -> DhtResult<&mut NodeState> {
		self.nodes.get_mut(r.0).ok_or(UnknownNode(r.0))
	}

	// State of a node that is part of a ring
	pub(crate) fn joined_state(&self, r: NodeRef) -> DhtResult<&NodeState> {
		let s = self.state(r)?;
		if s.finger_table.is_empty() {
			return Err(NotJoined(s.node.id));
		}
		Ok(s)
	}

	pub fn node(&self, r: NodeRef) -> DhtResult<&Node> {
		Ok(&self.state(r)?.node)
	}

	pub fn id(&self, r: NodeRef) -> DhtResult<Digest> {
		Ok(self.state(r)?.node.id)
	}

	pub fn is_joined(&self, r: NodeRef) -> DhtResult<bool> {
		Ok(!self.state(r)?.finger_table.is_empty())
	}

	pub fn get_successor(&self, r: NodeRef) -> DhtResult<NodeRef> {
		Ok(self.joined_state(r)?.finger_table[0])
	}

	pub fn get_predecessor(&self, r: NodeRef) -> DhtResult<Option<NodeRef>> {
		Ok(self.state(r)?.predecessor)
	}

	pub fn finger_table(&self, r: NodeRef) -> DhtResult<&[NodeRef]> {
		Ok(&self.state(r)?.finger_table)
	}

	/// Identifiers the finger table points to, in finger order
	pub fn finger_ids(&self, r: NodeRef) -> DhtResult<Vec<Digest>> {
		self.finger_table(r)?
			.iter()
			.map(|f| self.id(*f))
			.collect()
	}

	pub(crate) fn register(&mut self, r: NodeRef) -> DhtResult<()> {
		let id = self.id(r)?;
		self.registry.insert(id, r);
		Ok(())
	}

	/// Joined nodes in ring order (diagnostics only)
	pub fn members(&self) -> Vec<NodeRef> {
		self.registry.values().copied().collect()
	}

	/// Node that should own `id` according to the membership registry:
	/// the first member at or after `id`, wrapping to the smallest one.
	pub fn expected_owner(&self, id: Digest) -> Option<NodeRef> {
		self.registry
			.range(id..)
			.next()
			.or_else(|| self.registry.iter().next())
			.map(|(_, r)| *r)
	}

	/// Follow successor pointers from `start` once per member,
	/// returning the nodes visited and the node reached at the end
	pub fn successor_walk(&self, start: NodeRef) -> DhtResult<(Vec<NodeRef>, NodeRef)> {
		let mut visited = Vec::with_capacity(self.registry.len());
		let mut n = start;
		for _ in 0..self.registry.len() {
			visited.push(n);
			n = self.get_successor(n)?;
		}
		Ok((visited, n))
	}
}
