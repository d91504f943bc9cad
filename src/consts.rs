//! Общие константы формата (capacity, dynamic region, blob record, image file).

// -------- Capacity --------
pub const DEFAULT_CAPACITY: usize = 512;
pub const MIN_CAPACITY: usize = 1;
pub const MAX_CAPACITY: usize = 64 * 1024;

// -------- Reserved dynamic region --------
// Хвост образа, куда статические записи не попадают никогда.
pub const DEFAULT_RESERVED_DYNAMIC_BYTES: usize = 64;

// -------- Dynamic blob record --------
// Layout:
// [key_len u8]
// [key bytes]        -- key_len штук
// [delimiter u8]     -- BLOB_DELIMITER
// [payload bytes]    -- serialized JSON
// [terminator u8]    -- BLOB_TERMINATOR
//
// Overhead = 1 + 1 + 1 = 3 bytes on top of key + payload.
pub const BLOB_DELIMITER: u8 = b'|';
pub const BLOB_TERMINATOR: u8 = 0x00;
pub const BLOB_FRAMING_LEN: usize = 3;
// 0xFF в байте длины означает стёртый регион, поэтому максимум 254.
pub const BLOB_MAX_KEY_LEN: usize = (ERASED_BYTE - 1) as usize;

// Состояние "never written" у EEPROM/flash после стирания.
pub const ERASED_BYTE: u8 = 0xFF;

// -------- Image file (FileMedium) --------
pub const IMAGE_TMP_SUFFIX: &str = "tmp";
pub const IMAGE_LOCK_SUFFIX: &str = "lock";
