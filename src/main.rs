fn main() -> std::process::ExitCode {
  bard_lib::run()
}
