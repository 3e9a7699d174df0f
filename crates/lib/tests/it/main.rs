/*! Integration tests for dotconf.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - path: Tests for path normalization, PathBuf and the path! macro
 * - tree: Tests for ConfigTree reads, mutations, list operations and iteration
 * - merge: Tests for the Replace, Keep and Append merge strategies
 * - policy: Tests for cleaning policies applied after each change
 * - serialization: Tests for storing and restoring trees
 * - properties: Property-based tests for tree invariants
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("dotconf=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod path;
