fn main() {
    // Node binding setup is only needed when the napi surface is compiled in.
    if std::env::var_os("CARGO_FEATURE_NAPI").is_some() {
        napi_build::setup();
    }
}
