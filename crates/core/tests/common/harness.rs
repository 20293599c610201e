use std::io::Write;

use nbfgen_core::config::{AtAddressing, Config};
use tempfile::NamedTempFile;

/// Routes `tracing` output to the test harness; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("nbfgen_core=debug")
        .try_init();
}

/// A 4x2 pod with two vcache rows per side and 4-byte blocks.
///
/// Hash fields are 2 block bits, 2 column bits, 2 row bits, 23 index bits.
/// The tile group covers the whole pod.
pub fn small_config() -> Config {
    let mut config = Config::default();
    config.topology.num_tiles_x = 4;
    config.topology.num_tiles_y = 2;
    config.topology.num_vcache_rows = 2;
    config.cache.block_size = 4;
    config.tile_group.tg_dim_x = 4;
    config.tile_group.tg_dim_y = 2;
    config.image.at_addressing = AtAddressing::Word;
    config
}

/// [`small_config`] with DRAM hashing disabled and a 2x8 vcache.
pub fn small_block_mem_config() -> Config {
    let mut config = small_config();
    config.dram.enabled = false;
    config.cache.ways = 2;
    config.cache.sets = 8;
    config
}

/// [`small_config`] booting `px` by `py` pods.
pub fn multi_pod_config(px: u32, py: u32) -> Config {
    let mut config = small_config();
    config.topology.num_pods_x = px;
    config.topology.num_pods_y = py;
    config.topology.machine_pods_x = px;
    config.topology.machine_pods_y = py;
    config
}

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
