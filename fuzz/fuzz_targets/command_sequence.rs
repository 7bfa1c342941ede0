#![no_main]

use libfuzzer_sys::fuzz_target;

use flagfall_fuzz::{run_game, FuzzGame};

fuzz_target!(|game: FuzzGame| {
    if let Err(violation) = run_game(&game) {
        panic!("{}", violation);
    }
});
