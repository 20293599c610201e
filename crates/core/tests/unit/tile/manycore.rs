//! # Manycore Tile Helper Tests

use nbfgen_core::common::Coord;
use nbfgen_core::tile::{ManycoreTiles, TileConfigurator, csr};
use nbfgen_core::topology::derive_coordinates;
use nbfgen_core::{BootCommand, BootScript, Config};
use pretty_assertions::assert_eq;

use crate::common::harness::{multi_pod_config, small_block_mem_config, small_config};

const POD: Coord = Coord::new(16, 8);

fn tiles_for(config: &Config) -> ManycoreTiles {
    ManycoreTiles::new(config, &derive_coordinates(config), None)
}

#[test]
fn test_tile_group_offset_by_origin() {
    let mut config = small_config();
    config.tile_group.tgo_x = 1;
    config.tile_group.tgo_y = 1;
    config.tile_group.tg_dim_x = 2;
    config.tile_group.tg_dim_y = 1;
    let tiles = tiles_for(&config);
    assert_eq!(tiles.tile_group(POD), vec![Coord::new(17, 9), Coord::new(18, 9)]);

    let mut script = BootScript::new();
    tiles.configure_tile_group(&mut script, POD);
    assert_eq!(
        script.commands(),
        &[
            BootCommand::write(17, 9, csr::TGO_X, 17),
            BootCommand::write(17, 9, csr::TGO_Y, 9),
            BootCommand::write(18, 9, csr::TGO_X, 17),
            BootCommand::write(18, 9, csr::TGO_Y, 9),
        ]
    );
}

#[test]
fn test_vcache_rows_top_then_bottom() {
    let tiles = tiles_for(&small_config());
    let ys: Vec<u32> = tiles.vcaches(POD).iter().map(|c| c.y).collect();
    assert_eq!(ys, vec![7, 7, 7, 7, 6, 6, 6, 6, 10, 10, 10, 10, 11, 11, 11, 11]);
}

#[test]
fn test_wh_dest_splits_machine_in_half() {
    let config = multi_pod_config(2, 1);
    let tiles = tiles_for(&config);
    let epa = tiles.vcache_wh_dest_epa();
    assert_eq!(epa, 1 << 26);

    let mut west = BootScript::new();
    tiles.init_vcache_wh_dest(&mut west, POD, 0);
    assert!(west.commands().iter().all(|c| matches!(c, BootCommand::Write { value: 0, .. })));

    let mut east = BootScript::new();
    tiles.init_vcache_wh_dest(&mut east, Coord::new(20, 8), 1);
    assert!(east.commands().iter().all(|c| matches!(c, BootCommand::Write { value: 1, .. })));
}

#[test]
fn test_wh_dest_single_pod_midpoint() {
    let tiles = tiles_for(&small_config());
    let mut script = BootScript::new();
    tiles.init_vcache_wh_dest(&mut script, POD, 0);
    let top_row: Vec<u32> = script.commands()[..4]
        .iter()
        .filter_map(|c| match c {
            BootCommand::Write { value, .. } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(top_row, vec![0, 0, 1, 1]);
}

#[test]
fn test_vcache_tags_are_valid_and_locked() {
    let config = small_block_mem_config();
    let tiles = tiles_for(&config);
    let mut script = BootScript::new();
    tiles.init_vcache(&mut script, POD);
    assert_eq!(script.len(), 16 * 2 * 8);
    // Way 1, set 3 of the first vcache: line 11, 2 block bits.
    assert!(script.commands().contains(&BootCommand::write(
        16,
        7,
        (1 << 27) | (11 << 2),
        0xC000_0001
    )));
}

#[test]
fn test_disable_dram_writes_every_tile() {
    let tiles = tiles_for(&small_config());
    let mut script = BootScript::new();
    tiles.disable_dram(&mut script, POD);
    assert_eq!(script.len(), 8);
    assert!(script.commands().iter().all(|c| matches!(
        c,
        BootCommand::Write { loc, value: 0 } if loc.epa == csr::DRAM_ENABLE
    )));
}

#[test]
fn test_no_program_loads_nothing() {
    let config = small_config();
    let topology = derive_coordinates(&config);
    let translator = nbfgen_core::translate::AddressTranslator::new(&topology).unwrap();
    let tiles = tiles_for(&config);
    assert!(tiles.program().is_none());

    let mut script = BootScript::new();
    tiles.init_icache(&mut script, POD);
    tiles.init_dmem(&mut script, POD);
    tiles.init_dram(&mut script, POD, &translator);
    assert!(script.is_empty());
}

#[test]
fn test_icache_limited_to_entries() {
    let mut config = small_config();
    config.tile_group.icache_entries = 2;
    config.tile_group.tg_dim_x = 1;
    config.tile_group.tg_dim_y = 1;
    let program = nbfgen_core::tile::TileProgram::from_words(
        0x8000_0000,
        (0..4).map(|i| (0x2000_0000 + i, i as u32)),
    );
    let tiles = ManycoreTiles::new(&config, &derive_coordinates(&config), Some(program));
    let mut script = BootScript::new();
    tiles.init_icache(&mut script, POD);
    assert_eq!(
        script.commands(),
        &[
            BootCommand::write(16, 8, 1 << 27, 0),
            BootCommand::write(16, 8, (1 << 27) | 1, 1),
        ]
    );
}
