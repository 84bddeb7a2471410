// Dalvik executable (dex) class and method index
//
// Only the tables needed to name declared classes and referenced methods are
// read:
// ```
// header      string_ids, type_ids, proto_ids, method_ids, class_defs
// string_id   u32 offset -> uleb128 utf16 length, MUTF-8 bytes, NUL
// type_id     u32 string index
// proto_id    u32 shorty, u32 return type, u32 parameter list offset
// method_id   u16 class type, u16 proto, u32 name string
// class_def   u32 class type, 28 bytes we skip
// ```

use super::BinaryIndex;
use crate::error::{AppScopeError, Result};
use crate::mode::is_android_package;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

const DEX_MAGIC: &[u8] = b"dex\n";
const HEADER_SIZE: usize = 0x70;

const STRING_IDS_OFF: usize = 0x38;
const TYPE_IDS_OFF: usize = 0x40;
const PROTO_IDS_OFF: usize = 0x48;
const METHOD_IDS_OFF: usize = 0x58;
const CLASS_DEFS_OFF: usize = 0x60;

const PROTO_ID_SIZE: usize = 12;
const METHOD_ID_SIZE: usize = 8;
const CLASS_DEF_SIZE: usize = 32;

/// Declared classes and method references of one or more dex files
#[derive(Debug, Clone, Default)]
pub struct DexIndex {
    classes: Vec<String>,
    methods: Vec<String>,
}

impl DexIndex {
    /// Open a `.dex` file, or every `classes*.dex` inside an `.apk`
    pub fn open(path: &Path) -> Result<Self> {
        if is_android_package(path) {
            return Self::from_apk(path);
        }

        let bytes = fs::read(path).map_err(|source| AppScopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, path)
    }

    pub fn from_apk(path: &Path) -> Result<Self> {
        let archive_err = |source| AppScopeError::Archive {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| AppScopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;

        let mut dex_names: Vec<String> = archive
            .file_names()
            .filter(|name| is_dex_entry(name))
            .map(str::to_string)
            .collect();
        dex_names.sort_by_key(|name| dex_entry_order(name));

        if dex_names.is_empty() {
            return Err(AppScopeError::MalformedIndex {
                path: path.to_path_buf(),
                reason: "no classes.dex entry in archive".to_string(),
            });
        }

        let mut index = DexIndex::default();
        for name in dex_names {
            let mut entry = archive.by_name(&name).map_err(archive_err)?;
            // declared size is untrusted, read_to_end grows as needed
            let mut buffer = Vec::new();
            entry.read_to_end(&mut buffer).map_err(|source| AppScopeError::Io {
                path: path.join(&name),
                source,
            })?;

            let part = Self::from_bytes(&buffer, &path.join(&name))?;
            debug!(
                "{}: {} classes, {} methods",
                name,
                part.classes.len(),
                part.methods.len()
            );
            index.classes.extend(part.classes);
            index.methods.extend(part.methods);
        }

        Ok(index)
    }

    pub fn from_bytes(data: &[u8], path: &Path) -> Result<Self> {
        let reader = DexReader::new(data, path)?;

        let class_defs = reader.table(CLASS_DEFS_OFF, CLASS_DEF_SIZE)?;
        let mut classes = Vec::with_capacity(class_defs.0);
        for i in 0..class_defs.0 {
            let type_idx = reader.u32_at(class_defs.1 + i * CLASS_DEF_SIZE)?;
            classes.push(reader.type_descriptor(type_idx as usize)?);
        }

        let method_ids = reader.table(METHOD_IDS_OFF, METHOD_ID_SIZE)?;
        let mut methods = Vec::with_capacity(method_ids.0);
        for i in 0..method_ids.0 {
            methods.push(reader.method(method_ids.1 + i * METHOD_ID_SIZE)?);
        }

        Ok(Self { classes, methods })
    }

    pub fn from_parts(classes: Vec<String>, methods: Vec<String>) -> Self {
        Self { classes, methods }
    }
}

impl BinaryIndex for DexIndex {
    fn declared_classes(&self) -> &[String] {
        &self.classes
    }

    fn declared_methods(&self) -> &[String] {
        &self.methods
    }
}

fn is_dex_entry(name: &str) -> bool {
    !name.contains('/') && name.starts_with("classes") && name.ends_with(".dex")
}

/// classes.dex first, then classes2.dex, classes3.dex, ...
fn dex_entry_order(name: &str) -> u32 {
    name.trim_start_matches("classes")
        .trim_end_matches(".dex")
        .parse()
        .unwrap_or(1)
}

struct DexReader<'a> {
    data: &'a [u8],
    path: &'a Path,
}

impl<'a> DexReader<'a> {
    fn new(data: &'a [u8], path: &'a Path) -> Result<Self> {
        let reader = Self { data, path };
        if data.len() < HEADER_SIZE || !data.starts_with(DEX_MAGIC) {
            return Err(reader.malformed("missing dex header"));
        }
        Ok(reader)
    }

    fn malformed(&self, reason: impl Into<String>) -> AppScopeError {
        AppScopeError::MalformedIndex {
            path: PathBuf::from(self.path),
            reason: reason.into(),
        }
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.malformed(format!("read past end at offset {:#x}", offset)))
    }

    fn u16_at(&self, offset: usize) -> Result<u16> {
        let b = self.bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        let b = self.bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// (size, offset) pair stored in the header at `header_field`
    fn section(&self, header_field: usize) -> Result<(usize, usize)> {
        let size = self.u32_at(header_field)? as usize;
        let offset = self.u32_at(header_field + 4)? as usize;
        Ok((size, offset))
    }

    /// Like `section`, but the whole table must lie inside the file
    fn table(&self, header_field: usize, item_size: usize) -> Result<(usize, usize)> {
        let (count, offset) = self.section(header_field)?;
        match count
            .checked_mul(item_size)
            .and_then(|len| offset.checked_add(len))
        {
            Some(end) if end <= self.data.len() => Ok((count, offset)),
            _ => Err(self.malformed(format!(
                "table of {} entries at offset {:#x} exceeds file size {}",
                count,
                offset,
                self.data.len()
            ))),
        }
    }

    fn uleb128_at(&self, offset: usize) -> Result<(u32, usize)> {
        let mut result: u32 = 0;
        for i in 0..5 {
            let byte = self.bytes(offset + i, 1)?[0];
            result |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok((result, i + 1));
            }
        }
        Err(self.malformed(format!("bad uleb128 at offset {:#x}", offset)))
    }

    fn string(&self, idx: usize) -> Result<String> {
        let (count, table) = self.section(STRING_IDS_OFF)?;
        if idx >= count {
            return Err(self.malformed(format!("string index {} out of range", idx)));
        }
        let data_off = self.u32_at(table + idx * 4)? as usize;
        let (_utf16_len, header_len) = self.uleb128_at(data_off)?;
        let start = data_off + header_len;
        let rest = self.data.get(start..).ok_or_else(|| self.malformed("string data out of range"))?;
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.malformed("unterminated string"))?;
        Ok(String::from_utf8_lossy(&rest[..end]).into_owned())
    }

    fn type_descriptor(&self, idx: usize) -> Result<String> {
        let (count, table) = self.section(TYPE_IDS_OFF)?;
        if idx >= count {
            return Err(self.malformed(format!("type index {} out of range", idx)));
        }
        let string_idx = self.u32_at(table + idx * 4)?;
        self.string(string_idx as usize)
    }

    /// `(params)return` for a proto id
    fn proto(&self, idx: usize) -> Result<String> {
        let (count, table) = self.section(PROTO_IDS_OFF)?;
        if idx >= count {
            return Err(self.malformed(format!("proto index {} out of range", idx)));
        }
        let base = table + idx * PROTO_ID_SIZE;
        let return_type = self.u32_at(base + 4)?;
        let params_off = self.u32_at(base + 8)? as usize;

        let mut rendered = String::from("(");
        if params_off != 0 {
            let size = self.u32_at(params_off)? as usize;
            for i in 0..size {
                let type_idx = self.u16_at(params_off + 4 + i * 2)?;
                rendered.push_str(&self.type_descriptor(type_idx as usize)?);
            }
        }
        rendered.push(')');
        rendered.push_str(&self.type_descriptor(return_type as usize)?);
        Ok(rendered)
    }

    /// `Lowner;->name(params)return`
    fn method(&self, offset: usize) -> Result<String> {
        let class_idx = self.u16_at(offset)?;
        let proto_idx = self.u16_at(offset + 2)?;
        let name_idx = self.u32_at(offset + 4)?;
        Ok(format!(
            "{}->{}{}",
            self.type_descriptor(class_idx as usize)?,
            self.string(name_idx as usize)?,
            self.proto(proto_idx as usize)?
        ))
    }
}
