//! Export the reveal verifying key for on-chain deployment.
//!
//! Loads keys from `keys/` (or runs a fresh setup for the default circuit
//! shape) and prints the verifying key as hex, also writing a JSON copy
//! next to the keys.

use std::error::Error;
use std::path::Path;

use fogmove_circuits::CircuitParams;
use fogmove_prover::setup::RevealKeys;

fn main() -> Result<(), Box<dyn Error>> {
    let keys_dir = Path::new("keys");
    let params = CircuitParams::default();

    println!("Loading or generating reveal keys...");
    let keys = RevealKeys::load_or_setup(keys_dir, params)?;

    let vk = keys.keys.serialize_vk()?;

    println!("\n=== Reveal Verifying Key ===\n");
    println!(
        "Shape: {} path slots, {} hash rounds",
        keys.params.max_points, keys.params.hash_rounds
    );
    println!("Reveal VK ({} bytes):", vk.len());
    println!("0x{}\n", hex::encode(&vk));

    // Also export as JSON for scripting
    let json = serde_json::json!({
        "max_points": keys.params.max_points,
        "hash_rounds": keys.params.hash_rounds,
        "reveal_vk": format!("0x{}", hex::encode(&vk)),
    });

    let json_path = keys_dir.join("verifying_key.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&json)?)?;
    println!("JSON exported to {:?}", json_path);

    Ok(())
}
