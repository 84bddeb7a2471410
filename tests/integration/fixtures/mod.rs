//! Shared fixtures: dex images and APKs written to disk

use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Minimal dex image: one `run()V` method per class
pub fn build_dex(classes: &[&str]) -> Vec<u8> {
    let mut strings: Vec<&str> = classes.to_vec();
    strings.push("V");
    strings.push("run");
    let n = classes.len();
    let type_count = n + 1;

    let string_ids = 0x70;
    let type_ids = string_ids + strings.len() * 4;
    let proto_ids = type_ids + type_count * 4;
    let method_ids = proto_ids + 12;
    let class_defs = method_ids + n * 8;
    let string_data = class_defs + n * 32;

    let mut data = vec![0u8; string_data];
    data[..8].copy_from_slice(b"dex\n035\0");

    fn put(data: &mut [u8], at: usize, v: u32) {
        data[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    for (field, (size, off)) in [
        (0x38, (strings.len(), string_ids)),
        (0x40, (type_count, type_ids)),
        (0x48, (1, proto_ids)),
        (0x58, (n, method_ids)),
        (0x60, (n, class_defs)),
    ] {
        put(&mut data, field, size as u32);
        put(&mut data, field + 4, off as u32);
    }

    for i in 0..type_count {
        put(&mut data, type_ids + i * 4, i as u32);
    }
    put(&mut data, proto_ids, n as u32);
    put(&mut data, proto_ids + 4, n as u32);

    for i in 0..n {
        let m = method_ids + i * 8;
        data[m..m + 2].copy_from_slice(&(i as u16).to_le_bytes());
        put(&mut data, m + 4, (n + 1) as u32);
        put(&mut data, class_defs + i * 32, i as u32);
    }

    for (i, s) in strings.iter().enumerate() {
        let off = data.len();
        put(&mut data, string_ids + i * 4, off as u32);
        data.push(s.len() as u8);
        data.extend_from_slice(s.as_bytes());
        data.push(0);
    }
    data
}

pub fn write_apk(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// `platforms/android-N/android.jar` for each level
pub fn write_platforms(root: &Path, levels: &[u32]) {
    fs::create_dir_all(root).unwrap();
    for level in levels {
        let dir = root.join(format!("android-{}", level));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("android.jar"), b"").unwrap();
    }
}
