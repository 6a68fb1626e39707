use litpack::BuildVariant;

use crate::cli::VariantArgs;
use crate::error::Result;

/// Print the variant selected by `LITPACK_WATCH` / `NODE_ENV`.
pub fn execute(args: VariantArgs) -> Result<()> {
    let variant = BuildVariant::from_process_env();
    if args.json {
        println!("{}", serde_json::json!({ "variant": variant.as_str() }));
    } else {
        println!("{variant}");
    }
    Ok(())
}
