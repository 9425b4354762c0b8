fn main() {
  zord::main()
}
