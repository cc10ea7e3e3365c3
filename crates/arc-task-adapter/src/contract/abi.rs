/*
[INPUT]:  Solidity interfaces of the todo list, marketplace and token contracts
[OUTPUT]: Generated ABI call/return types (alloy sol! bindings)
[POS]:    Contract layer - wire-level ABI definitions
[UPDATE]: When a deployed contract changes its external interface
*/

#![allow(clippy::too_many_arguments)]

use alloy_sol_types::sol;

sol! {
    interface ITodoList {
        struct Task {
            uint256 id;
            string title;
            string description;
            bool completed;
            uint256 createdAt;
            uint8 priority;
        }

        function createTask(string _title, string _description, uint8 _priority) external returns (uint256);
        function completeTask(uint256 _taskId) external;
        function deleteTask(uint256 _taskId) external;
        function getMyTasks() external view returns (Task[] memory);
        function getStats() external view returns (uint256 total, uint256 completed, uint256 pending);
    }
}

sol! {
    interface IMarketplace {
        struct Task {
            uint256 id;
            address poster;
            address worker;
            string title;
            string description;
            uint256 bounty;
            uint8 status;
            uint256 createdAt;
        }

        function postTask(string _title, string _description, uint256 _bounty) external returns (uint256);
        function takeTask(uint256 _taskId) external;
        function completeTask(uint256 _taskId) external;
        function approveTask(uint256 _taskId) external;
        function cancelTask(uint256 _taskId) external;
        function getAllTasks() external view returns (Task[] memory);
    }
}

sol! {
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}
