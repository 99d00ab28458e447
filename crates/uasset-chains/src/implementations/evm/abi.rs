//! ERC-20 read interface.

use alloy::sol;

sol! {
	/// Read-only subset of the ERC-20 token interface.
	interface IERC20 {
		function name() external view returns (string);
		function symbol() external view returns (string);
		function decimals() external view returns (uint8);
		function totalSupply() external view returns (uint256);
		function balanceOf(address owner) external view returns (uint256);
	}
}
