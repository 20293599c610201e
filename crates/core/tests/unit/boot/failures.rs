//! # Failed Run Tests
//!
//! Configuration errors stop the run before any command exists; malformed
//! images abort it without producing a finished script.

use nbfgen_core::common::{ConfigError, ParseError};
use nbfgen_core::topology::derive_coordinates;
use nbfgen_core::{BootSequencer, ImageSource, NbfError, generate};

use crate::common::harness::small_config;
use crate::common::mocks::{MockTiles, quiet_tiles};

#[test]
fn test_unsupported_hash_touches_no_tiles() {
    let mut config = small_config();
    config.topology.num_tiles_x = 6;
    config.tile_group.tg_dim_x = 6;
    // No expectations: any hook call would panic.
    let tiles = MockTiles::new();
    let err = BootSequencer::new(&config, derive_coordinates(&config), &tiles).unwrap_err();
    assert_eq!(err, ConfigError::UnsupportedHash { num_tiles_x: 6 });
}

#[test]
fn test_generate_reports_config_error() {
    let mut config = small_config();
    config.topology.num_tiles_x = 5;
    config.tile_group.tg_dim_x = 5;
    let err = generate(&config, &ImageSource::Text(String::new()), None).unwrap_err();
    assert!(matches!(
        err,
        NbfError::Config(ConfigError::UnsupportedHash { num_tiles_x: 5 })
    ));
}

#[test]
fn test_generate_rejects_zero_geometry() {
    let mut config = small_config();
    config.cache.sets = 0;
    let err = generate(&config, &ImageSource::Text(String::new()), None).unwrap_err();
    assert!(matches!(err, NbfError::Config(ConfigError::ZeroGeometry { .. })));
}

#[test]
fn test_generate_rejects_oversized_cord_width() {
    let mut config = small_config();
    config.nbf.x_cord_width = 32;
    let err = generate(&config, &ImageSource::Text(String::new()), None).unwrap_err();
    assert!(matches!(
        err,
        NbfError::Config(ConfigError::CordWidth { axis: "x", width: 32 })
    ));
}

#[test]
fn test_generate_rejects_truncated_bridge_base() {
    let mut config = small_config();
    config.dram.bp_dram_base = 0x1_8000_0000;
    let err = generate(&config, &ImageSource::Text(String::new()), None).unwrap_err();
    assert!(matches!(
        err,
        NbfError::Config(ConfigError::BridgeValue { field: "dram.bp_dram_base", .. })
    ));
}

#[test]
fn test_malformed_image_aborts_run() {
    let config = small_config();
    let tiles = quiet_tiles();
    let sequencer = BootSequencer::new(&config, derive_coordinates(&config), &tiles).unwrap();
    let err = sequencer
        .run(&ImageSource::Text("@0\nEF BE QQ DE\n".to_string()))
        .unwrap_err();
    assert!(matches!(err, NbfError::Parse(ParseError::BadToken { line: 2, .. })));
}

#[test]
fn test_missing_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = ImageSource::File(dir.path().join("absent.mem"));
    let err = generate(&small_config(), &image, None).unwrap_err();
    assert!(matches!(err, NbfError::Parse(ParseError::Io { .. })));
    assert!(err.to_string().contains("absent.mem"));
}
