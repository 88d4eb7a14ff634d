use shadow_rs::ShadowBuilder;

fn main() {
    // Version and build metadata for `--version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
