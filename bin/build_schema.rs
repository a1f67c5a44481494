//! Binary for generating contract schemas from odra modules.
#![doc = "Binary for generating contract schemas from odra modules."]

#[allow(unused_imports)]
use harvest_contracts;

fn main() {
    // This binary is used by the Odra build system to produce contract schemas
    // The actual generation is handled by the odra-build crate
}
