//! `hash` - print the four hash values of a name

use anyhow::Result;
use warpack::crypto::{hash_string, HashType};

pub fn run(name: &str) -> Result<()> {
    println!(
        "table offset: {:#010x}",
        hash_string(name, HashType::TableOffset)
    );
    println!("name A:       {:#010x}", hash_string(name, HashType::NameA));
    println!("name B:       {:#010x}", hash_string(name, HashType::NameB));
    println!(
        "file key:     {:#010x}",
        hash_string(name, HashType::FileKey)
    );
    Ok(())
}
