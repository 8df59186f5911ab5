use chord_ring::core::{
	calculate_hash,
	construct_node,
	Config,
	DhtError::DuplicateIdentifier,
	Network,
	NodeRef
};
use clap::Parser;
use inquire::{Text, CustomUserError};
use anyhow::anyhow;

#[derive(Parser)]
struct Args {
	/// Number of bits of the identifier space
	#[clap(short, long, default_value_t = 8)]
	bits: u32,

	/// Key to look up once the ring is built
	#[clap(short, long, default_value = "my_file.txt")]
	key: String,

	/// Keep a prompt open to join more nodes and look up keys
	#[clap(short, long)]
	interactive: bool,

	/// Names of the nodes to join, in order (the first one is the contact)
	#[clap(default_values = &["node1", "node2", "node3"])]
	names: Vec<String>
}

const COMMANDS: [&str; 4] = [
	"join",
	"lookup",
	"fingers",
	"ring"
];

// Nodes joined so far, in join order
struct Session {
	net: Network,
	joined: Vec<NodeRef>
}

impl Session {
	fn join(&mut self, name: &str) -> anyhow::Result<NodeRef> {
		// refuse a taken identifier before the node enters the network
		let node = construct_node(name, self.net.space());
		for r in self.joined.iter() {
			if self.net.id(*r)? == node.id {
				return Err(DuplicateIdentifier(node.id).into());
			}
		}
		let r = self.net.add_node(node)?;
		self.net.join(r, self.joined.first().copied())?;
		self.joined.push(r);
		Ok(r)
	}

	fn print_fingers(&self) -> anyhow::Result<()> {
		for r in self.joined.iter() {
			println!("{}: fingers -> {:?}", self.net.node(*r)?, self.net.finger_ids(*r)?);
		}
		Ok(())
	}

	fn print_ring(&self) -> anyhow::Result<()> {
		let mut line = Vec::new();
		for r in self.net.members() {
			line.push(self.net.node(r)?.to_string());
		}
		println!("{}", line.join(" -> "));
		Ok(())
	}

	fn lookup(&self, key: &str) -> anyhow::Result<()> {
		let contact = self.joined.first().copied().ok_or(anyhow!("lookup: the ring is empty"))?;
		let id = calculate_hash(key.as_bytes(), self.net.space());
		let owner = self.net.find_successor(contact, id)?;
		println!("Key '{}' (id={}) is stored at {}", key, id, self.net.node(owner)?);
		Ok(())
	}
}

// Only the command word is suggested; arguments are free text
fn suggest_command(v: &str) -> Result<Vec<String>, CustomUserError> {
	if v.is_empty() || v.contains(char::is_whitespace) {
		return Ok(Vec::new());
	}
	Ok(COMMANDS.iter()
		.filter(|c| c.starts_with(v))
		.map(|c| c.to_string())
		.collect())
}

fn complete_command(v: &str) -> Result<Option<String>, CustomUserError> {
	Ok(suggest_command(v)?
		.first()
		.map(|c| format!("{} ", c)))
}

fn execute_command(session: &mut Session, command: &str) -> anyhow::Result<()> {
	let words: Vec<_> = command.split_whitespace().collect();
	if words.len() == 0 {
		return Err(anyhow!("invalid command"));
	}

	match words[0] {
		"join" => {
			if words.len() != 2 {
				return Err(anyhow!("join: invalid number of arguments"));
			}
			let r = session.join(words[1])?;
			println!("{} joined", session.net.node(r)?);
		},
		"lookup" => {
			if words.len() != 2 {
				return Err(anyhow!("lookup: invalid number of arguments"));
			}
			session.lookup(words[1])?;
		},
		"fingers" => session.print_fingers()?,
		"ring" => session.print_ring()?,
		_ => {
			return Err(anyhow!("invalid command"));
		}
	};
	Ok(())
}


fn main() -> anyhow::Result<()> {
	env_logger::init();
	let args = Args::parse();

	let config = Config {
		bits: args.bits,
		..Config::default()
	};
	let mut session = Session {
		net: Network::new(config)?,
		joined: Vec::new()
	};
	for name in args.names.iter() {
		session.join(name)?;
	}

	println!("===== Node Finger Tables =====");
	session.print_fingers()?;
	println!();
	session.lookup(&args.key)?;

	if !args.interactive {
		return Ok(());
	}
	loop {
		let command = Text::new("")
			.with_suggester(&suggest_command)
			.with_completer(&complete_command)
			.prompt()?;

		match execute_command(&mut session, &command) {
			Ok(_) => (),
			Err(e) => println!("Error: {}", e)
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn session(bits: u32) -> Session {
		Session {
			net: Network::new(Config {
				bits,
				..Config::default()
			}).unwrap(),
			joined: Vec::new()
		}
	}

	#[test]
	fn test_duplicate_name_leaves_no_node() -> anyhow::Result<()> {
		// node2 and node3 both hash to 62 on 6 bits
		let mut s = session(6);
		s.join("node1")?;
		s.join("node2")?;
		let err = s.join("node3").unwrap_err();
		assert_eq!(err.downcast_ref::<chord_ring::core::DhtError>(), Some(&DuplicateIdentifier(62)));
		assert_eq!(s.net.len(), 2);
		assert_eq!(s.joined.len(), 2);
		s.lookup("my_file.txt")?;
		Ok(())
	}

	#[test]
	fn test_command_completion() {
		assert_eq!(suggest_command("lo").unwrap(), vec!["lookup".to_string()]);
		assert!(suggest_command("").unwrap().is_empty());
		assert!(suggest_command("join n").unwrap().is_empty());
		assert_eq!(complete_command("fi").unwrap(), Some("fingers ".to_string()));
		assert_eq!(complete_command("x").unwrap(), None);
	}
}
