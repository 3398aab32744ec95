use escape_sink::entrypoints::demonstrate;

fn main() {
    demonstrate();
}
