/// Build-script entry point: writes the codecs of the given models into
/// `OUT_DIR` and returns the driver's result.
///
/// ```ignore
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     precodec::build!(models::all()?)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! build {
    ($models:expr) => {{
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!(
            "cargo:rerun-if-changed={}",
            $crate::config::CONFIG_FILE
        );

        //
        // CODECS
        //

        $crate::driver::run(&$models)
    }};
}
