mod cli_tests;
mod report_tests;
mod scoring_tests;
