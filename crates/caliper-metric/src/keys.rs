//! Keys of the core metrics.

// Size
pub const LINES: &str = "lines";
pub const NCLOC: &str = "ncloc";
pub const NCLOC_DATA: &str = "ncloc_data";
pub const NCLOC_LANGUAGE_DISTRIBUTION: &str = "ncloc_language_distribution";
pub const FILES: &str = "files";
pub const DIRECTORIES: &str = "directories";
pub const CLASSES: &str = "classes";
pub const FUNCTIONS: &str = "functions";
pub const STATEMENTS: &str = "statements";
pub const GENERATED_LINES: &str = "generated_lines";
pub const GENERATED_NCLOC: &str = "generated_ncloc";
pub const NEW_LINES: &str = "new_lines";

// Documentation
pub const COMMENT_LINES: &str = "comment_lines";
pub const COMMENT_LINES_DENSITY: &str = "comment_lines_density";
pub const PUBLIC_API: &str = "public_api";
pub const PUBLIC_UNDOCUMENTED_API: &str = "public_undocumented_api";
pub const PUBLIC_DOCUMENTED_API_DENSITY: &str = "public_documented_api_density";

// Complexity
pub const COMPLEXITY: &str = "complexity";
pub const FILE_COMPLEXITY: &str = "file_complexity";
pub const FILE_COMPLEXITY_DISTRIBUTION: &str = "file_complexity_distribution";
pub const COMPLEXITY_IN_CLASSES: &str = "complexity_in_classes";
pub const CLASS_COMPLEXITY: &str = "class_complexity";
pub const COMPLEXITY_IN_FUNCTIONS: &str = "complexity_in_functions";
pub const FUNCTION_COMPLEXITY: &str = "function_complexity";
pub const FUNCTION_COMPLEXITY_DISTRIBUTION: &str = "function_complexity_distribution";
pub const COGNITIVE_COMPLEXITY: &str = "cognitive_complexity";

// Duplication
pub const DUPLICATED_LINES: &str = "duplicated_lines";
pub const DUPLICATED_BLOCKS: &str = "duplicated_blocks";
pub const DUPLICATED_FILES: &str = "duplicated_files";
pub const DUPLICATED_LINES_DENSITY: &str = "duplicated_lines_density";

// Tests
pub const TESTS: &str = "tests";
pub const TEST_EXECUTION_TIME: &str = "test_execution_time";
pub const TEST_ERRORS: &str = "test_errors";
pub const SKIPPED_TESTS: &str = "skipped_tests";
pub const TEST_FAILURES: &str = "test_failures";
pub const TEST_SUCCESS_DENSITY: &str = "test_success_density";

// Coverage
pub const COVERAGE: &str = "coverage";
pub const LINES_TO_COVER: &str = "lines_to_cover";
pub const UNCOVERED_LINES: &str = "uncovered_lines";
pub const LINE_COVERAGE: &str = "line_coverage";
pub const CONDITIONS_TO_COVER: &str = "conditions_to_cover";
pub const UNCOVERED_CONDITIONS: &str = "uncovered_conditions";
pub const BRANCH_COVERAGE: &str = "branch_coverage";
pub const COVERAGE_LINE_HITS_DATA: &str = "coverage_line_hits_data";
pub const CONDITIONS_BY_LINE: &str = "conditions_by_line";
pub const COVERED_CONDITIONS_BY_LINE: &str = "covered_conditions_by_line";

// New code coverage
pub const NEW_COVERAGE: &str = "new_coverage";
pub const NEW_LINES_TO_COVER: &str = "new_lines_to_cover";
pub const NEW_UNCOVERED_LINES: &str = "new_uncovered_lines";
pub const NEW_LINE_COVERAGE: &str = "new_line_coverage";
pub const NEW_CONDITIONS_TO_COVER: &str = "new_conditions_to_cover";
pub const NEW_UNCOVERED_CONDITIONS: &str = "new_uncovered_conditions";
pub const NEW_BRANCH_COVERAGE: &str = "new_branch_coverage";

// Issues
pub const VIOLATIONS: &str = "violations";
pub const NEW_VIOLATIONS: &str = "new_violations";
pub const BLOCKER_VIOLATIONS: &str = "blocker_violations";
pub const CRITICAL_VIOLATIONS: &str = "critical_violations";
pub const MAJOR_VIOLATIONS: &str = "major_violations";
pub const MINOR_VIOLATIONS: &str = "minor_violations";
pub const INFO_VIOLATIONS: &str = "info_violations";
pub const NEW_BLOCKER_VIOLATIONS: &str = "new_blocker_violations";
pub const NEW_CRITICAL_VIOLATIONS: &str = "new_critical_violations";
pub const NEW_MAJOR_VIOLATIONS: &str = "new_major_violations";
pub const NEW_MINOR_VIOLATIONS: &str = "new_minor_violations";
pub const NEW_INFO_VIOLATIONS: &str = "new_info_violations";
pub const OPEN_ISSUES: &str = "open_issues";
pub const REOPENED_ISSUES: &str = "reopened_issues";
pub const CONFIRMED_ISSUES: &str = "confirmed_issues";
pub const FALSE_POSITIVE_ISSUES: &str = "false_positive_issues";
pub const WONT_FIX_ISSUES: &str = "wont_fix_issues";
pub const CODE_SMELLS: &str = "code_smells";
pub const BUGS: &str = "bugs";
pub const VULNERABILITIES: &str = "vulnerabilities";
pub const SECURITY_HOTSPOTS: &str = "security_hotspots";
pub const NEW_CODE_SMELLS: &str = "new_code_smells";
pub const NEW_BUGS: &str = "new_bugs";
pub const NEW_VULNERABILITIES: &str = "new_vulnerabilities";
pub const NEW_SECURITY_HOTSPOTS: &str = "new_security_hotspots";

// Quality gate
pub const ALERT_STATUS: &str = "alert_status";
pub const QUALITY_GATE_DETAILS: &str = "quality_gate_details";
