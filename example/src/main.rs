use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use spindle::{DateTime, DateTimeKind, Decimal, Sh128};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Serialize, Deserialize, PartialEq, Debug)]
enum Species {
    PrionailurusViverrinus,
    LynxLynx,
    FelisCatus,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Cat {
    name: String,
    species: Species,
    #[serde(with = "serde_bytes")]
    chip: Vec<u8>,
    weight_kg: Option<f32>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Adoption {
    #[serde(with = "spindle_serde::wire::guid")]
    id: Uuid,
    #[serde(with = "spindle_serde::wire::decimal")]
    fee: Decimal,
    #[serde(with = "spindle_serde::wire::date_time")]
    signed: DateTime,
    cats: Vec<Cat>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let adoption = Adoption {
        id: Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8),
        fee: Decimal::new(12_550, 2),
        signed: DateTime::new(638_000_000_000_000_000, DateTimeKind::Utc).context("date out of range")?,
        cats: vec![
            Cat { name: "Jessica".to_owned(), species: Species::PrionailurusViverrinus, chip: vec![0x10, 0x20], weight_kg: Some(3.5) },
            Cat { name: "Wantan".to_owned(), species: Species::LynxLynx, chip: vec![], weight_kg: None },
            Cat { name: "Fluffy".to_owned(), species: Species::FelisCatus, chip: vec![0xff; 8], weight_kg: Some(5.25) },
        ],
    };

    let bytes = spindle_serde::to_bytes(&adoption)?;
    let json = serde_json::to_vec(&adoption)?;
    let msgpack = rmp_serde::to_vec(&adoption)?;
    info!(spindle = bytes.len(), json = json.len(), msgpack = msgpack.len(), "encoded sizes");

    let decoded: Adoption = spindle_serde::from_bytes(&bytes)?;
    ensure!(adoption == decoded, "decoded record differs from the original");

    println!("spindle: {} bytes, json: {} bytes, msgpack: {} bytes", bytes.len(), json.len(), msgpack.len());
    println!("fingerprint: {}", Sh128::compute(&bytes));
    Ok(())
}
