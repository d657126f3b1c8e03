//! Subcommand tests

use std::fs;
use std::path::{Path, PathBuf};

use lsdj::fs::{File, Index};
use lsdj::lsdsng::LsdSng;
use lsdj::song::SongMemory;
use lsdj::sram::SRam;
use lsdj_tools::*;
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};

fn index(value: u8) -> Index {
    Index::new(value).unwrap()
}

/// A song that differs from the empty song in its first byte
fn song(marker: u8) -> SongMemory {
    let mut song = SongMemory::new();
    song.as_mut_slice()[0] = marker;
    song
}

/// Write a save holding the given (slot, name, version) songs
fn write_sav(path: &Path, songs: &[(u8, &str, u8)]) -> SRam {
    let mut sram = SRam::new();
    for &(slot, name, version) in songs {
        sram.filesystem
            .insert_file(index(slot), &name.parse().unwrap(), version, &song(slot))
            .unwrap();
    }
    sram.to_path(path).unwrap();
    sram
}

fn sha256(song: &SongMemory) -> [u8; 32] {
    Sha256::digest(song.as_slice()).into()
}

fn output(run: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut out = Vec::new();
    run(&mut out);
    String::from_utf8(out).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// Export
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_export_all_songs() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    write_sav(&sav, &[(0, "YOKAI", 0x1B), (2, "ASPHALT", 0x13)]);

    let args = ExportArgs {
        path: sav,
        output: Some(dir.path().join("out")),
        output_pos: true,
        output_version: true,
        yes: true,
        ..ExportArgs::default()
    };
    let printed = output(|out| export(&args, out).unwrap());

    assert_eq!(
        printed,
        "00. YOKAI    => 00_YOKAI_v1B.lsdsng\n02. ASPHALT  => 02_ASPHALT_v13.lsdsng\n"
    );

    let lsdsng = LsdSng::from_path(dir.path().join("out/02_ASPHALT_v13.lsdsng")).unwrap();
    assert_eq!(lsdsng.name.as_str(), "ASPHALT");
    assert_eq!(lsdsng.version, 0x13);
    assert_eq!(lsdsng.decompress().unwrap(), song(2));
}

#[test]
fn test_export_selected_indices() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    write_sav(&sav, &[(0, "YOKAI", 1), (1, "FUNGAL", 2)]);

    let args = ExportArgs {
        path: sav,
        index: vec![1, 5],
        output: Some(dir.path().to_owned()),
        yes: true,
        ..ExportArgs::default()
    };
    output(|out| export(&args, out).unwrap());

    assert!(dir.path().join("FUNGAL.lsdsng").exists());
    assert!(!dir.path().join("YOKAI.lsdsng").exists());
}

#[test]
fn test_export_repeated_indices_in_slot_order() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    write_sav(&sav, &[(0, "YOKAI", 1), (1, "FUNGAL", 2)]);

    // Without --yes a second write of the same file would prompt
    let args = ExportArgs {
        path: sav,
        index: vec![1, 0, 1],
        output: Some(dir.path().to_owned()),
        ..ExportArgs::default()
    };
    let printed = output(|out| export(&args, out).unwrap());

    assert_eq!(
        printed,
        "00. YOKAI    => YOKAI.lsdsng\n01. FUNGAL   => FUNGAL.lsdsng\n"
    );
}

#[test]
fn test_export_invalid_index() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    write_sav(&sav, &[(0, "YOKAI", 1)]);

    let args = ExportArgs {
        path: sav,
        index: vec![32],
        output: Some(dir.path().to_owned()),
        ..ExportArgs::default()
    };
    assert!(export(&args, Vec::new()).is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// Import
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_import_songs_and_saves() {
    let dir = tempfile::tempdir().unwrap();

    let songs = dir.path().join("songs");
    fs::create_dir(&songs).unwrap();
    LsdSng::from_song("HONEY".parse().unwrap(), 0x1F, &song(9))
        .unwrap()
        .to_path(songs.join("a.lsdsng"))
        .unwrap();
    write_sav(&songs.join("b.sav"), &[(3, "CACTUAR", 0x2E), (4, "KALEIDO", 0x18)]);

    let target = dir.path().join("new.sav");
    let args = ImportArgs {
        song: vec![songs],
        output: target.clone(),
        yes: true,
    };
    let printed = output(|out| import(&args, out).unwrap());
    assert!(printed.ends_with(&format!("Wrote {}\n", target.display())));

    let sram = SRam::from_path(&target).unwrap();
    let names: Vec<String> = sram
        .filesystem
        .files()
        .flatten()
        .map(|file| file.name().unwrap().as_str().to_owned())
        .collect();
    assert_eq!(names, vec!["HONEY", "CACTUAR", "KALEIDO"]);

    let honey = sram.filesystem.file(index(0)).unwrap();
    assert_eq!(honey.version(), 0x1F);
    assert_eq!(honey.decompress().unwrap(), song(9));
}

#[test]
fn test_import_runs_out_of_space() {
    let dir = tempfile::tempdir().unwrap();

    // Barely compressible songs of well over 20 blocks each
    let mut noisy = SongMemory::new();
    for (offset, byte) in noisy.as_mut_slice()[..0x6000].iter_mut().enumerate() {
        *byte = (offset % 7) as u8 + 1;
    }
    let lsdsng = LsdSng::from_song("NOISE".parse().unwrap(), 0, &noisy).unwrap();

    let paths: Vec<PathBuf> = (0..10)
        .map(|number| dir.path().join(format!("{number}.lsdsng")))
        .collect();
    for path in &paths {
        lsdsng.to_path(path).unwrap();
    }

    let args = ImportArgs {
        song: paths,
        output: dir.path().join("full.sav"),
        yes: true,
    };
    let error = import(&args, Vec::new()).unwrap_err();
    assert!(error.to_string().contains("Ran out of space"));
    assert!(!dir.path().join("full.sav").exists());
}

// ═══════════════════════════════════════════════════════════════════════
// Inspect
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_sav() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    let sram = write_sav(&sav, &[(0, "YOKAI", 27), (12, "HONEY", 31)]);

    let args = InspectArgs {
        path: vec![sav.clone()],
        recursive: false,
    };
    let printed = output(|out| inspect(&args, out).unwrap());

    let expected = format!(
        "{}\n{}\n  0 | YOKAI    | v027 | f022\n 12 | HONEY    | v031 | f022\n",
        sav.display(),
        inspect::memory_bar(&sram.filesystem)
    );
    assert_eq!(printed, expected);
}

#[test]
fn test_inspect_folder_separates_files() {
    let dir = tempfile::tempdir().unwrap();
    write_sav(&dir.path().join("a.sav"), &[(0, "A", 1)]);
    LsdSng::from_song("B".parse().unwrap(), 2, &SongMemory::new())
        .unwrap()
        .to_path(dir.path().join("b.lsdsng"))
        .unwrap();
    fs::write(dir.path().join("c.txt"), "ignored").unwrap();

    let args = InspectArgs {
        path: vec![dir.path().to_owned()],
        recursive: false,
    };
    let printed = output(|out| inspect(&args, out).unwrap());

    assert_eq!(printed.matches("\n\n").count(), 1);
    assert!(printed.contains("  0 | A        | v001 | f022\n"));
    assert!(printed.contains("  0 | B        | v002 | f022\n"));
    assert!(!printed.contains("c.txt"));
}

// ═══════════════════════════════════════════════════════════════════════
// Collect
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_collect_groups_versions() {
    let dir = tempfile::tempdir().unwrap();
    write_sav(&dir.path().join("old.sav"), &[(0, "YOKAI", 1), (1, "HONEY", 1)]);
    write_sav(&dir.path().join("new.sav"), &[(5, "YOKAI", 2)]);

    let outcome = collect::collect_songs(&[dir.path().to_owned()], false);

    assert_eq!(outcome.songs.len(), 2);
    assert!(outcome.errors.is_empty());

    let yokai = &outcome.songs["YOKAI"];
    assert_eq!(yokai.len(), 2);
    assert_ne!(yokai[0].sha256, yokai[1].sha256);
}

#[test]
fn test_collect_prints_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("a.sav");
    let new = dir.path().join("b.sav");
    let exported = dir.path().join("c.lsdsng");

    write_sav(&old, &[(0, "YOKAI", 1)]);
    write_sav(&new, &[(5, "YOKAI", 2)]);
    LsdSng::from_song("YOKAI".parse().unwrap(), 3, &song(7))
        .unwrap()
        .to_path(&exported)
        .unwrap();

    let args = CollectArgs {
        paths: vec![dir.path().to_owned()],
        ..CollectArgs::default()
    };
    let printed = output(|out| collect(&args, out).unwrap());

    let hashes = [sha256(&song(7)), sha256(&song(5)), sha256(&song(0))];
    let len = collect::unique_prefix_len(hashes.iter());
    assert!((1..32).contains(&len));

    let expected = format!(
        "YOKAI\n  v003 {} {}\n  v002 {} {}[5]\n  v001 {} {}[0]\n",
        hex::encode(&hashes[0][..len]),
        exported.display(),
        hex::encode(&hashes[1][..len]),
        new.display(),
        hex::encode(&hashes[2][..len]),
        old.display(),
    );
    assert_eq!(printed, expected);
}

#[test]
fn test_collect_reports_corrupt_songs() {
    let dir = tempfile::tempdir().unwrap();
    let sav = dir.path().join("bangers.sav");
    write_sav(&sav, &[(0, "YOKAI", 1), (1, "HONEY", 2)]);

    // YOKAI starts in block 1; make it jump outside of the filesystem
    let mut bytes = fs::read(&sav).unwrap();
    let block = SongMemory::LEN + 0x200;
    bytes[block..block + 2].copy_from_slice(&[0xE0, 0xC5]);
    fs::write(&sav, bytes).unwrap();

    let outcome = collect::collect_songs(&[sav.clone()], false);
    assert_eq!(
        outcome.errors,
        vec![collect::Source::Sav {
            path: sav.clone(),
            index: 0,
        }]
    );
    let names: Vec<&str> = outcome.songs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["HONEY"]);

    let args = CollectArgs {
        paths: vec![sav.clone()],
        ..CollectArgs::default()
    };
    let printed = output(|out| collect(&args, out).unwrap());

    let expected = format!(
        "Could not decompress {}[0]\nHONEY\n  v002 {} {}[1]\n",
        sav.display(),
        hex::encode(&sha256(&song(1))[..1]),
        sav.display(),
    );
    assert_eq!(printed, expected);
}

#[test]
fn test_collect_json() {
    let dir = tempfile::tempdir().unwrap();
    write_sav(&dir.path().join("bangers.sav"), &[(0, "YOKAI", 3)]);
    let json = dir.path().join("report/collect.json");

    let args = CollectArgs {
        paths: vec![dir.path().to_owned()],
        recursive: true,
        json: Some(json.clone()),
    };
    output(|out| collect(&args, out).unwrap());

    let text = fs::read_to_string(json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let instance = &value["songs"]["YOKAI"][0];
    assert_eq!(instance["version"], 3);
    assert_eq!(instance["sha256"].as_str().unwrap().len(), 64);
    assert_eq!(instance["source"]["sav"]["index"], 0);
}
