/// Entity-level validation rules
pub mod validation_tests;

/// Insert/query helpers against a mocked Postgres connection
pub mod mock_tests;
