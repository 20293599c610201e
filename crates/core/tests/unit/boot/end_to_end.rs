//! # End-to-End Script Tests
//!
//! Complete scripts generated with the stock manycore tile helpers.

use nbfgen_core::common::Coord;
use nbfgen_core::tile::TileProgram;
use nbfgen_core::writer::render;
use nbfgen_core::{BootCommand, BootStage, ImageSource, generate};
use pretty_assertions::assert_eq;

use crate::common::harness::{
    init_tracing, multi_pod_config, small_block_mem_config, small_config, temp_file,
};

fn text(image: &str) -> ImageSource {
    ImageSource::Text(image.to_string())
}

#[test]
fn test_single_word_image() {
    init_tracing();
    let script = generate(&small_config(), &text("@0\nEF BE AD DE\n"), None).unwrap();

    assert_eq!(
        script.stage_commands(BootStage::DramStripe),
        &[BootCommand::write(16, 7, 0, 0xDEAD_BEEF)]
    );
    assert_eq!(script.len(), 63);
    assert_eq!(script.fence_positions(), vec![5, 9, 10, 52]);
    assert!(script.out_of_range().is_empty());
}

#[test]
fn test_rendered_script() {
    let script = generate(&small_config(), &text("@0\nEF BE AD DE\n"), None).unwrap();
    let nbf = render(&script);
    let lines: Vec<&str> = nbf.lines().collect();

    assert_eq!(lines.len(), 63);
    assert_eq!(lines[0], "81_180_00002008_00000001");
    assert_eq!(lines[1], "81_180_00002010_80000000");
    assert_eq!(lines[5], "ff_ff_00000000_00000000");
    assert_eq!(lines[51], "10_07_00000000_deadbeef");
    assert_eq!(lines[53], "10_08_00002000_00000000");
    assert_eq!(lines[61], "81_180_00002008_00000000");
    assert_eq!(lines[62], "ff_ff_ffffffff_ffffffff");
}

#[test]
fn test_per_pod_writes_of_stock_tiles() {
    let script = generate(&small_config(), &text(""), None).unwrap();
    let per_pod = script.stage_commands(BootStage::PerPodConfig);
    // Group origin x/y for 8 tiles, PC for 8 tiles, wh_dest for 16 vcaches.
    assert_eq!(per_pod.len(), 16 + 8 + 16);
    assert!(!per_pod.iter().any(BootCommand::is_fence));
    assert_eq!(per_pod[0], BootCommand::write(16, 8, 0x2001, 16));
    assert_eq!(per_pod[1], BootCommand::write(16, 8, 0x2002, 8));
    assert_eq!(per_pod[16], BootCommand::write(16, 8, 0x2003, 0x8000_0000));
}

#[test]
fn test_unfreeze_covers_tile_group_in_column_order() {
    let script = generate(&small_config(), &text(""), None).unwrap();
    let tiles: Vec<Coord> = script
        .stage_commands(BootStage::Unfreeze)
        .iter()
        .filter_map(|c| match c {
            BootCommand::Unfreeze(coord) => Some(*coord),
            _ => None,
        })
        .collect();
    assert_eq!(tiles.len(), 8);
    assert_eq!(&tiles[..3], &[Coord::new(16, 8), Coord::new(16, 9), Coord::new(17, 8)]);
}

#[test]
fn test_image_file_with_byte_addresses() {
    let mut config = small_config();
    config.image.at_addressing = Default::default();
    let file = temp_file("@00000010\n01 00 00 00\n");
    let script = generate(&config, &ImageSource::File(file.path().to_path_buf()), None).unwrap();
    // Byte 0x10 is word 4: block offset 0, column 1.
    assert_eq!(
        script.stage_commands(BootStage::DramStripe),
        &[BootCommand::write(17, 7, 0, 1)]
    );
}

#[test]
fn test_block_memory_script() {
    let script = generate(&small_block_mem_config(), &text("@40\n02 00 00 00\n"), None).unwrap();
    let per_pod = script.stage_commands(BootStage::PerPodConfig);
    // 40 common writes, DRAM disable for 8 tiles, 16 vcaches x 2 ways x 8 sets of tags.
    assert_eq!(per_pod.len(), 40 + 8 + 256);
    assert!(per_pod.contains(&BootCommand::write(16, 8, 0x2004, 0)));
    assert_eq!(
        script.stage_commands(BootStage::DramStripe),
        &[BootCommand::write(17, 7, 0, 2)]
    );
}

#[test]
fn test_out_of_range_words_are_skipped() {
    let script = generate(&small_block_mem_config(), &text("@200\n01 00 00 00\n"), None).unwrap();
    assert!(script.stage_commands(BootStage::DramStripe).is_empty());
    assert_eq!(script.out_of_range(), &[0x2000_0200]);
    assert!(script.is_finished());
}

#[test]
fn test_bp_image_striped_over_origin_pod_only() {
    let script = generate(&multi_pod_config(2, 1), &text("@0\n01 00 00 00\n"), None).unwrap();
    assert_eq!(
        script.stage_commands(BootStage::DramStripe),
        &[BootCommand::write(16, 7, 0, 1)]
    );
}

#[test]
fn test_tile_program_is_loaded_into_every_pod() {
    let program = TileProgram::from_words(
        0x8000_0040,
        [(0x400, 0x11), (0x2000_0000, 0x13), (0x2000_0001, 0x93)],
    );
    let script = generate(&multi_pod_config(2, 1), &text(""), Some(program)).unwrap();
    let per_pod = script.stage_commands(BootStage::PerPodConfig);

    let icache_epa = (1 << 27) | 1;
    assert!(per_pod.contains(&BootCommand::write(16, 8, icache_epa, 0x93)));
    assert!(per_pod.contains(&BootCommand::write(23, 9, icache_epa, 0x93)));
    assert!(per_pod.contains(&BootCommand::write(21, 9, 0x400, 0x11)));
    assert!(per_pod.contains(&BootCommand::write(17, 8, 0x2003, 0x8000_0040)));

    // The program's DRAM words go through the hash of each pod.
    assert!(per_pod.contains(&BootCommand::write(16, 7, 1, 0x93)));
    assert!(per_pod.contains(&BootCommand::write(20, 7, 1, 0x93)));
}

#[test]
fn test_skip_dram_instruction_load() {
    let mut config = small_config();
    config.tile_group.skip_dram_instruction_load = true;
    let program = TileProgram::from_words(0x8000_0000, [(0x2000_0000, 0x13)]);
    let script = generate(&config, &text(""), Some(program)).unwrap();
    let per_pod = script.stage_commands(BootStage::PerPodConfig);
    assert!(!per_pod.contains(&BootCommand::write(16, 7, 0, 0x13)));
    assert!(per_pod.contains(&BootCommand::write(16, 8, 1 << 27, 0x13)));
}
