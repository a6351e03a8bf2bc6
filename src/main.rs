fn main() {
    hornlint::cli::run();
}
