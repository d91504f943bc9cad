use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

use eepromkv::{FileMedium, Layout, NvStore, StoreConfig};

/// Open the image at its own size (capacity = file length) and apply `layout`.
pub fn open_store(image: &Path, layout: Option<&Path>) -> Result<NvStore<FileMedium>> {
    let capacity = FileMedium::image_len(image)
        .with_context(|| format!("no image at {} (run `eepromkv init` first)", image.display()))?;
    let cfg = StoreConfig::from_env().with_capacity(capacity);
    let medium = FileMedium::new(image).with_fsync(cfg.fsync);
    let mut store = NvStore::open(medium, cfg)?;
    if let Some(p) = layout {
        Layout::load(p)?.apply(&mut store)?;
    }
    Ok(store)
}

/// Raw entry input: "-" (stdin), "@file", "hex:..." or a literal UTF-8 string.
pub fn decode_value_arg(arg: &str) -> Result<(Vec<u8>, &'static str)> {
    if arg == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok((buf, "stdin"));
    }
    if let Some(p) = arg.strip_prefix('@') {
        return Ok((read_all(&PathBuf::from(p))?, "file"));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        return Ok((decode_hex(hx)?, "hex"));
    }
    Ok((arg.as_bytes().to_vec(), "literal"))
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string must have even length"));
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).step_by(2) {
        let h = (bytes[i] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i))?;
        let l = (bytes[i + 1] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i + 1))?;
        out.push(((h << 4) | l) as u8);
    }
    Ok(out)
}

pub fn display_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => format!("(binary {} B)", bytes.len()),
    }
}

/// 16 bytes per line, each line prefixed with its offset.
pub fn hex_dump(bytes: &[u8], base: usize) -> String {
    let mut out = String::new();
    for (n, chunk) in bytes.chunks(16).enumerate() {
        if n > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{:04x}:", base + n * 16));
        for b in chunk {
            out.push_str(&format!(" {:02x}", b));
        }
    }
    out
}

pub fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

pub fn read_all(p: &Path) -> Result<Vec<u8>> {
    let mut f = OpenOptions::new()
        .read(true)
        .open(p)
        .with_context(|| format!("open {}", p.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}
