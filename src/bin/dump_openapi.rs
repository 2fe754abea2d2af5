use std::fs;

fn main() -> anyhow::Result<()> {
    let doc = access_gate::docs::build_openapi()?;
    let s = serde_json::to_string_pretty(&doc)?;
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/access-gate-openapi.json".to_string());
    fs::write(&path, s)?;
    println!("wrote {}", path);
    Ok(())
}
