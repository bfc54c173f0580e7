// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> String {
    let base = "# Title\n\nParagraph with **bold** and *italic* and `code`.\n\n- Bullet point\n1. Ordered item\n\n{~ card title=\"Card\" ~}\nCard body with **markup**.\n{~~}\n\n```rust\nfn example() {}\n```\n\n";
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn generate_nested_directives(depth: usize) -> String {
    let mut content = String::new();
    for level in 0..depth {
        content.push_str(&format!("{{~ level{level} ~}}\ntext {level}\n"));
    }
    for _ in 0..depth {
        content.push_str("{~~}\n");
    }
    content
}
