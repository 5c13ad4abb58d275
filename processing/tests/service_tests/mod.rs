pub mod receipt_service_tests;
