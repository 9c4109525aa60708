mod proxy_error_tests;
