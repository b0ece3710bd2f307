fn main() {
    sat_testing_lib::run();
}
