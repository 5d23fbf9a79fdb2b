//! Unit tests for SMS module

mod mock_sms_tests;
