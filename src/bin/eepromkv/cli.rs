use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI над файловым образом EEPROM.
///
/// The static layout is not stored in the image, so commands that touch
/// static entries take the same `--layout` JSON file every time:
/// [
///   {"key":"heat","kind":"i32"},
///   {"key":"states","kind":"bool","count":3},
///   {"key":"raw","size":16}
/// ]
#[derive(Parser, Debug)]
#[command(name = "eepromkv", version, about = "EEPROM key-value image CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Create a new erased image (all bytes 0xFF)
    Init {
        #[arg(long)]
        image: PathBuf,
        /// Capacity in bytes (defaults to EEKV_CAPACITY or 512)
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Apply the layout and print static-region usage
    ///
    /// Пример:
    ///   eepromkv usage --image ./nv.img --layout ./layout.json
    ///   eepromkv usage --image ./nv.img --layout ./layout.json --json
    Usage {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        layout: PathBuf,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Read a static entry (typed value, element list, or hex for raw entries)
    Get {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        key: String,
    },
    /// Write a static entry and commit
    ///
    /// Value is parsed by the entry kind: "42", "3.5", "true",
    /// "1,0,1" for arrays; raw entries take "hex:0a0b", "@file" or a literal string.
    Set {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        key: String,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Read the dynamic blob tagged with KEY and print it as JSON
    GetJson {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        key: String,
        /// Needed only with EEKV_BLOB_ANCHOR=cursor
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Replace the dynamic blob with JSON tagged with KEY
    SetJson {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        key: String,
        /// JSON literal, or @path to read it from a file
        #[arg(long)]
        json: String,
        /// Needed only with EEKV_BLOB_ANCHOR=cursor
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Hex dump of the whole image (shared lock, no writes)
    Dump {
        #[arg(long)]
        image: PathBuf,
        /// JSON output (capacity, hex, blob key at the tail anchor)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
