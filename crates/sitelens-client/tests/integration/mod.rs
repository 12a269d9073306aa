mod fetcher_tests;
mod provider_tests;
