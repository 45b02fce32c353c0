// Property tests; `cargo test --test property`.

mod projection;
